//! Text spans and their style flags.

use bitflags::bitflags;

bitflags! {
    /// Style bits attached to a span.
    ///
    /// The bit layout matches the one popularized by MuPDF's text extraction,
    /// so style tables printed by this crate read the same way.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u32 {
        /// Text rise is positive
        const SUPERSCRIPT = 1 << 0;
        /// Italic or oblique face
        const ITALIC = 1 << 1;
        /// Serif face
        const SERIF = 1 << 2;
        /// Monospaced face
        const MONOSPACE = 1 << 3;
        /// Bold, black or heavy face
        const BOLD = 1 << 4;
    }
}

impl StyleFlags {
    /// Infer face flags from a base font name such as `Times-BoldItalic`.
    pub fn from_font_name(font_name: &str) -> Self {
        let name = font_name.to_lowercase();
        let mut flags = StyleFlags::empty();

        if name.contains("bold") || name.contains("black") || name.contains("heavy") {
            flags |= StyleFlags::BOLD;
        }
        if name.contains("italic") || name.contains("oblique") {
            flags |= StyleFlags::ITALIC;
        }
        if name.contains("courier") || name.contains("mono") || name.contains("consolas") {
            flags |= StyleFlags::MONOSPACE;
        } else if name.contains("times")
            || (name.contains("serif") && !name.contains("sans"))
            || name.contains("georgia")
            || name.contains("garamond")
            || name.contains("cambria")
        {
            flags |= StyleFlags::SERIF;
        }

        flags
    }
}

/// One contiguous run of uniformly styled text on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content, untrimmed
    pub text: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Style bits
    pub flags: StyleFlags,
    /// Base font name without subset prefix
    pub font_name: String,
    /// Page this span was found on (0-based)
    pub page_index: usize,
}

impl TextSpan {
    /// Create a span, inferring style flags from the font name.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        page_index: usize,
    ) -> Self {
        let font_name = font_name.into();
        Self {
            text: text.into(),
            font_size,
            flags: StyleFlags::from_font_name(&font_name),
            font_name,
            page_index,
        }
    }

    /// Override the style flags.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check whether two spans share font name, size and flags.
    pub fn same_style(&self, other: &TextSpan) -> bool {
        self.font_size.to_bits() == other.font_size.to_bits()
            && self.flags == other.flags
            && self.font_name == other.font_name
    }
}
