//! PDF layout engine.
//!
//! Opens documents with lopdf and turns each page's content stream into the
//! block/line/span structure consumed by [`crate::outline`].

mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, FormXObject, LopdfBackend, PageId, PdfBackend,
    PdfValue,
};
pub use layout::{strip_subset_prefix, LayoutExtractor};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
