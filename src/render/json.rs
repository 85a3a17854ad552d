//! JSON rendering for outline results.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::DocumentResult;

const INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline result to JSON.
///
/// Non-ASCII text is written as raw UTF-8.
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let mut buf = Vec::new();
    to_json_writer(result, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

/// Write an outline result as JSON to `writer`.
pub fn to_json_writer<W: Write>(result: &DocumentResult, format: JsonFormat, writer: W) -> Result<()> {
    let serialized = match format {
        JsonFormat::Pretty => {
            let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
            result.serialize(&mut ser)
        }
        JsonFormat::Compact => {
            let mut ser = Serializer::new(writer);
            result.serialize(&mut ser)
        }
    };

    serialized.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
