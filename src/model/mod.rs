//! Document model types.
//!
//! [`LayoutDocument`] is what the layout engine produces and the outline
//! passes consume; [`DocumentResult`] is what they hand to the renderer.

mod layout;
mod outline;
mod span;

pub use layout::{Block, LayoutDocument, Metadata, PageLayout, TextLine};
pub use outline::{DocumentResult, HeadingLevel, OutlineEntry};
pub use span::{StyleFlags, TextSpan};
