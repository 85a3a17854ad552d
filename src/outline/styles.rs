//! Style frequency analysis.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::model::{LayoutDocument, TextSpan};

/// A distinct visual style: font size, style bits and font name.
///
/// Sizes compare by exact bit pattern. The layout engine emits the same `f32`
/// for the same style every time, so no tolerance is applied.
#[derive(Debug, Clone)]
pub struct StyleKey {
    /// Font size in points
    pub font_size: f32,
    /// Raw style bits
    pub flags: u32,
    /// Base font name
    pub font_name: String,
}

impl StyleKey {
    pub fn new(font_size: f32, flags: u32, font_name: impl Into<String>) -> Self {
        Self {
            font_size,
            flags,
            font_name: font_name.into(),
        }
    }

    /// The key a span is counted under.
    pub fn of_span(span: &TextSpan) -> Self {
        Self::new(span.font_size, span.flags.bits(), span.font_name.clone())
    }
}

impl PartialEq for StyleKey {
    fn eq(&self, other: &Self) -> bool {
        self.font_size.to_bits() == other.font_size.to_bits()
            && self.flags == other.flags
            && self.font_name == other.font_name
    }
}

impl Eq for StyleKey {}

impl Hash for StyleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_size.to_bits().hash(state);
        self.flags.hash(state);
        self.font_name.hash(state);
    }
}

/// Occurrence counts per [`StyleKey`], in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct StyleFrequencyTable {
    counts: IndexMap<StyleKey, usize>,
    total: usize,
}

impl StyleFrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of a span's style.
    pub fn record(&mut self, span: &TextSpan) {
        self.record_key(StyleKey::of_span(span));
    }

    /// Count one occurrence of a style.
    pub fn record_key(&mut self, key: StyleKey) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of a style (0 if never seen).
    pub fn count(&self, key: &StyleKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct styles.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, equal to the number of spans recorded.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Styles and counts in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&StyleKey, usize)> + '_ {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// The style with the highest count.
    ///
    /// Among equal counts the style seen first wins.
    pub fn most_frequent(&self) -> Option<&StyleKey> {
        let mut best: Option<(&StyleKey, usize)> = None;
        for (key, count) in self.iter() {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(key, _)| key)
    }

    /// Font sizes of every recorded style, in first-seen order (may repeat).
    pub fn font_sizes(&self) -> impl Iterator<Item = f32> + '_ {
        self.counts.keys().map(|k| k.font_size)
    }
}

/// Build the style frequency table for a document.
///
/// Every span of every text block is counted; whitespace-only spans included.
pub fn analyze(doc: &LayoutDocument) -> StyleFrequencyTable {
    let mut table = StyleFrequencyTable::new();
    for span in doc.spans() {
        table.record(span);
    }
    table
}
