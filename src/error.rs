//! Error types for pdfoutline.
//!
//! Outline synthesis itself cannot fail. Every variant here comes from the
//! layers around it: reading files, parsing PDF structure, laying out pages
//! and writing JSON.

use std::io;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading an input or writing an output failed.
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// The data does not start with `%PDF-`.
    #[error("not a PDF: missing %PDF- header")]
    UnknownFormat,

    /// The header version is not of the form `d.d`.
    #[error("unreadable PDF version in header: {0:?}")]
    UnsupportedVersion(String),

    /// lopdf rejected the document structure.
    #[error("malformed PDF: {0}")]
    PdfParse(String),

    #[error("encrypted PDF: text cannot be decoded")]
    Encrypted,

    /// A page's content stream could not be laid out (strict mode only).
    #[error("page layout failed: {0}")]
    TextExtract(String),

    /// 1-based page number outside `1..=total`.
    #[error("page {0} out of range 1..={1}")]
    PageOutOfRange(u32, u32),

    /// Serializing a result failed.
    #[error("JSON rendering failed: {0}")]
    Render(String),

    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            other => Error::PdfParse(other.to_string()),
        }
    }
}
