//! Page layout types produced by the layout engine.
//!
//! A [`LayoutDocument`] is an immutable, re-iterable view of every span in a
//! document, grouped the way the layout engine found them: pages hold blocks,
//! text blocks hold lines, lines hold spans. Both analysis passes walk the
//! same value, so the PDF is only decoded once.

use super::TextSpan;

/// A line of spans sharing one baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    /// Spans in content-stream order
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Create a line from spans.
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Check if the line has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A block on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A text object with one or more lines
    Text(Vec<TextLine>),
    /// A painted image; carries no text
    Image {
        /// XObject resource name
        name: String,
    },
}

impl Block {
    /// Lines of a text block, `None` for non-text blocks.
    pub fn lines(&self) -> Option<&[TextLine]> {
        match self {
            Block::Text(lines) => Some(lines.as_slice()),
            Block::Image { .. } => None,
        }
    }

    /// Check if this is a text block.
    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text(_))
    }
}

/// All blocks of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Page index (0-based)
    pub index: usize,
    /// Blocks in content-stream order
    pub blocks: Vec<Block>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            blocks: Vec::new(),
        }
    }

    /// Append a block.
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Append a text block built from the given lines.
    pub fn push_lines(&mut self, lines: Vec<TextLine>) {
        self.blocks.push(Block::Text(lines));
    }

    /// Iterate every span of the page in block, line, span order.
    ///
    /// Blocks without lines are skipped.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> + '_ {
        self.blocks
            .iter()
            .filter_map(Block::lines)
            .flatten()
            .flat_map(|line| line.spans.iter())
    }
}

/// Document metadata from the Info dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// PDF producer
    pub producer: Option<String>,
    /// PDF version (e.g., "1.7")
    pub pdf_version: String,
    /// Total number of pages
    pub page_count: u32,
    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create metadata with a PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }

    /// Title with surrounding whitespace removed, if anything remains.
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A laid-out document: metadata plus pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDocument {
    /// Document metadata
    pub metadata: Metadata,
    /// Pages in document order
    pub pages: Vec<PageLayout>,
}

impl LayoutDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn add_page(&mut self, page: PageLayout) {
        self.pages.push(page);
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The first page, if any.
    pub fn first_page(&self) -> Option<&PageLayout> {
        self.pages.first()
    }

    /// Iterate every span in the document, page by page.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> + '_ {
        self.pages.iter().flat_map(PageLayout::spans)
    }

    /// Total number of spans.
    pub fn span_count(&self) -> usize {
        self.spans().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, page: usize) -> TextSpan {
        TextSpan::new(text, size, "Helvetica", page)
    }

    #[test]
    fn test_page_spans_skip_images() {
        let mut page = PageLayout::new(0);
        page.push_lines(vec![TextLine::new(vec![span("a", 12.0, 0)])]);
        page.push_block(Block::Image {
            name: "Im1".to_string(),
        });
        page.push_lines(vec![
            TextLine::new(vec![span("b", 12.0, 0), span("c", 14.0, 0)]),
            TextLine::new(vec![span("d", 12.0, 0)]),
        ]);

        let texts: Vec<_> = page.spans().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_document_spans_in_page_order() {
        let mut doc = LayoutDocument::new();
        for i in 0..3 {
            let mut page = PageLayout::new(i);
            page.push_lines(vec![TextLine::new(vec![span(&format!("p{}", i), 12.0, i)])]);
            doc.add_page(page);
        }

        let pages: Vec<_> = doc.spans().map(|s| s.page_index).collect();
        assert_eq!(pages, vec![0, 1, 2]);
        assert_eq!(doc.span_count(), 3);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_line_text() {
        let line = TextLine::new(vec![span("Hello ", 12.0, 0), span("World", 12.0, 0)]);
        assert_eq!(line.text(), "Hello World");
        assert!(!line.is_empty());
    }

    #[test]
    fn test_trimmed_title() {
        let mut meta = Metadata::with_version("1.7");
        assert_eq!(meta.trimmed_title(), None);

        meta.title = Some("   ".to_string());
        assert_eq!(meta.trimmed_title(), None);

        meta.title = Some("  Annual Report ".to_string());
        assert_eq!(meta.trimmed_title(), Some("Annual Report"));
    }
}
