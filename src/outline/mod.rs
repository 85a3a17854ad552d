//! Heading inference from font metrics.
//!
//! Two passes over a [`LayoutDocument`](crate::model::LayoutDocument):
//!
//! 1. [`analyze`] counts how often each (size, flags, font) style occurs.
//! 2. [`synthesize`] takes the most frequent style as body text, ranks the
//!    larger sizes into H1-H3 and walks the document again collecting every
//!    span at a ranked size.
//!
//! Neither pass can fail and neither touches the filesystem.

mod levels;
mod styles;
mod synthesizer;

pub use levels::LevelMap;
pub use styles::{analyze, StyleFrequencyTable, StyleKey};
pub use synthesizer::{collect_headings, extract_outline, resolve_title, synthesize};
