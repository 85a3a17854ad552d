//! Title resolution and outline extraction.

use crate::model::{DocumentResult, LayoutDocument, OutlineEntry};

use super::{analyze, LevelMap, StyleFrequencyTable};

/// Pick a document title.
///
/// In order: the metadata title, the largest span on the first page, then
/// `fallback`. The result is trimmed.
///
/// The first-page scan keeps the earliest span at the largest size: a later
/// span only replaces it when strictly larger. Spans of size 0 never win.
pub fn resolve_title(doc: &LayoutDocument, fallback: &str) -> String {
    if let Some(title) = doc.metadata.trimmed_title() {
        return title.to_string();
    }

    if let Some(title) = largest_first_page_text(doc) {
        return title;
    }

    fallback.trim().to_string()
}

fn largest_first_page_text(doc: &LayoutDocument) -> Option<String> {
    let page = doc.first_page()?;

    let mut max_size = 0.0_f32;
    let mut title: Option<&str> = None;
    for span in page.spans() {
        if span.font_size > max_size {
            max_size = span.font_size;
            title = Some(&span.text);
        }
    }

    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Synthesize the title and heading outline of a document.
///
/// `styles` must be the table built from `doc` by [`analyze`]. The body style
/// is its most frequent entry; an empty table yields an empty outline.
pub fn synthesize(
    doc: &LayoutDocument,
    styles: &StyleFrequencyTable,
    fallback: &str,
) -> DocumentResult {
    let title = resolve_title(doc, fallback);

    let body = match styles.most_frequent() {
        Some(body) => body,
        None => return DocumentResult::empty(title),
    };

    let levels = LevelMap::from_styles(styles, body.font_size);
    log::debug!(
        "Body style: {}pt flags={} font={}; {} heading size(s)",
        body.font_size,
        body.flags,
        body.font_name,
        levels.len()
    );
    for (size, level) in levels.iter() {
        log::debug!("  {} <- {}pt", level, size);
    }

    let outline = collect_headings(doc, &levels);
    DocumentResult { title, outline }
}

/// Walk every span in document order and keep the ones whose size is mapped.
pub fn collect_headings(doc: &LayoutDocument, levels: &LevelMap) -> Vec<OutlineEntry> {
    if levels.is_empty() {
        return Vec::new();
    }

    let mut outline = Vec::new();
    for (page_index, page) in doc.pages.iter().enumerate() {
        for span in page.spans() {
            let Some(level) = levels.level_for(span.font_size) else {
                continue;
            };
            let text = span.text.trim();
            if !text.is_empty() {
                outline.push(OutlineEntry::new(level, text, page_index as u32 + 1));
            }
        }
    }
    outline
}

/// Run both passes over a document.
///
/// ```
/// use pdfoutline::model::{LayoutDocument, PageLayout, TextLine, TextSpan};
/// use pdfoutline::outline::extract_outline;
///
/// let mut page = PageLayout::new(0);
/// page.push_lines(vec![TextLine::new(vec![TextSpan::new("Intro", 24.0, "Helvetica", 0)])]);
/// for _ in 0..3 {
///     page.push_lines(vec![TextLine::new(vec![TextSpan::new("body", 12.0, "Helvetica", 0)])]);
/// }
/// let mut doc = LayoutDocument::new();
/// doc.add_page(page);
///
/// let result = extract_outline(&doc, "report");
/// assert_eq!(result.title, "Intro");
/// assert_eq!(result.outline[0].text, "Intro");
/// ```
pub fn extract_outline(doc: &LayoutDocument, fallback: &str) -> DocumentResult {
    let styles = analyze(doc);
    synthesize(doc, &styles, fallback)
}
