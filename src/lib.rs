//! # pdfoutline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! Headings are inferred from font metrics alone: the most frequent text
//! style is taken as body text, and the three largest font sizes above it
//! become H1, H2 and H3.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{outline_file, render};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let result = outline_file("report.pdf")?;
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout engine**: text spans with size, style flags and font, via lopdf
//! - **Deterministic outlines**: same document, same JSON, every run
//! - **Batch processing**: a directory of PDFs in parallel with Rayon
//! - **Failure isolation**: one broken document never stops a batch

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{run_batch, run_batch_with, BatchOptions, BatchReport};
pub use detect::{detect_header_from_bytes, detect_header_from_path, is_pdf, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    DocumentResult, HeadingLevel, LayoutDocument, Metadata, OutlineEntry, PageLayout, StyleFlags,
    TextSpan,
};
pub use outline::{analyze, extract_outline, synthesize, LevelMap, StyleFrequencyTable};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::JsonFormat;

use std::path::Path;

/// Lay out a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::parse_file;
///
/// let doc = parse_file("report.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<LayoutDocument> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Lay out a PDF file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<LayoutDocument> {
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse()
}

/// Lay out a PDF held in memory.
pub fn parse_bytes(data: &[u8]) -> Result<LayoutDocument> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Extract the title and outline of a PDF file.
///
/// The file stem is used as the title when neither the metadata nor the
/// first page provides one.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::outline_file;
///
/// let result = outline_file("report.pdf").unwrap();
/// for entry in &result.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    batch::process_file(path, &ParseOptions::default())
}

/// Extract the title and outline of an in-memory PDF.
pub fn outline_bytes(data: &[u8], fallback_title: &str) -> Result<DocumentResult> {
    let doc = parse_bytes(data)?;
    Ok(extract_outline(&doc, fallback_title))
}

/// Extract an outline and render it as JSON in one call.
///
/// ```no_run
/// use pdfoutline::{to_json, JsonFormat};
///
/// let json = to_json("report.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("report.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = outline_file(path)?;
    render::to_json(&result, format)
}
