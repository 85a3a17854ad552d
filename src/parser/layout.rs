//! Layout extraction for PDF pages.
//!
//! Walks a page's content stream and groups shown text into blocks, lines
//! and spans with font size, style flags and font name attached:
//!
//! - every `BT … ET` text object becomes one text block;
//! - a vertical move of the baseline starts a new line;
//! - consecutive show operators in the same font, size and flags are merged
//!   into one span.
//!
//! Painted image XObjects become [`Block::Image`] entries so that the page's
//! block sequence stays faithful, even though they carry no text. Form
//! XObjects are walked in place, so text drawn inside them is laid out like
//! page text.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::model::{Block, PageLayout, StyleFlags, TextLine, TextSpan};

use super::backend::{BackendFontInfo, ContentOp, PageId, PdfBackend, PdfValue};

/// Thousandths of text space that count as a word gap inside a `TJ` array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extracts [`PageLayout`]s from any [`PdfBackend`].
pub struct LayoutExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> LayoutExtractor<'a, B> {
    /// Create a new layout extractor.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Lay out one page. `page_index` is 0-based.
    pub fn extract_page(&self, page_index: usize, page_id: PageId) -> Result<PageLayout> {
        let fonts = font_names(self.backend.page_fonts(page_id)?);

        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;

        let mut walker = PageWalker::new(self.backend, page_id, page_index, fonts);
        for op in &ops {
            walker.apply(op);
        }
        Ok(walker.finish())
    }
}

/// Strip a `ABCDEF+` subset tag from a base font name.
pub fn strip_subset_prefix(base_font: &str) -> &str {
    match base_font.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => {
            rest
        }
        _ => base_font,
    }
}

fn font_names(fonts: Vec<BackendFontInfo>) -> HashMap<Vec<u8>, String> {
    fonts
        .into_iter()
        .map(|f| (f.name, strip_subset_prefix(&f.base_font).to_string()))
        .collect()
}

/// Content stream interpreter state for one page.
struct PageWalker<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page_id: PageId,
    page_index: usize,
    fonts: HashMap<Vec<u8>, String>,
    /// Forms currently being painted.
    active_forms: HashSet<PageId>,

    ctm: Matrix,
    ctm_stack: Vec<Matrix>,

    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    rise: f32,
    text_matrix: Matrix,
    line_matrix: Matrix,

    page: PageLayout,
    lines: Vec<TextLine>,
    spans: Vec<TextSpan>,
    line_y: Option<f32>,
    moved: bool,
}

impl<'a, B: PdfBackend + ?Sized> PageWalker<'a, B> {
    fn new(
        backend: &'a B,
        page_id: PageId,
        page_index: usize,
        fonts: HashMap<Vec<u8>, String>,
    ) -> Self {
        Self {
            backend,
            page_id,
            page_index,
            fonts,
            active_forms: HashSet::new(),
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 0.0,
            rise: 0.0,
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            page: PageLayout::new(page_index),
            lines: Vec::new(),
            spans: Vec::new(),
            line_y: None,
            moved: false,
        }
    }

    fn apply(&mut self, op: &ContentOp) {
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.ctm = m.concat(&self.ctm);
                }
            }
            "BT" => {
                self.flush_block();
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => self.flush_block(),
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    self.font_name = self
                        .fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                    self.font_resource = name.clone();
                }
                if let Some(size) = op.number(1) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.number(0) {
                    self.leading = leading;
                }
            }
            "Ts" => {
                if let Some(rise) = op.number(0) {
                    self.rise = rise;
                }
            }
            "Td" | "TD" => {
                let tx = op.number(0).unwrap_or(0.0);
                let ty = op.number(1).unwrap_or(0.0);
                if op.operator == "TD" {
                    self.leading = -ty;
                }
                self.move_line(tx, ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(op) {
                    self.line_matrix = m;
                    self.text_matrix = m;
                    self.moved = true;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let text = self.decode_array(items);
                    self.show(text);
                }
            }
            "'" | "\"" => {
                self.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                    let text = self.decode(bytes);
                    self.show(text);
                }
            }
            "Do" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    if self.backend.is_image_xobject(self.page_id, name) {
                        self.flush_block();
                        self.page.push_block(Block::Image {
                            name: String::from_utf8_lossy(name).to_string(),
                        });
                    } else {
                        self.paint_form(name);
                    }
                }
            }
            _ => {}
        }
    }

    /// Walk a Form XObject's content under its own matrix and fonts.
    ///
    /// Graphics and text state are restored afterwards, as if the form were
    /// wrapped in `q ... Q`. A form that paints itself is skipped.
    fn paint_form(&mut self, name: &[u8]) {
        let label = String::from_utf8_lossy(name);
        let form = match self.backend.form_xobject(self.page_id, name) {
            Ok(Some(form)) => form,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Skipping form XObject {}: {}", label, e);
                return;
            }
        };
        if let Some(id) = form.id {
            if !self.active_forms.insert(id) {
                log::debug!("Form XObject {} paints itself, skipping", label);
                return;
            }
        }
        let ops = match self.backend.decode_content(&form.content) {
            Ok(ops) => ops,
            Err(e) => {
                log::warn!("Skipping form XObject {}: {}", label, e);
                if let Some(id) = form.id {
                    self.active_forms.remove(&id);
                }
                return;
            }
        };

        self.flush_block();
        let saved_fonts = self.fonts.clone();
        let saved_ctm = self.ctm;
        let saved_depth = self.ctm_stack.len();
        let saved_text = (
            self.font_resource.clone(),
            self.font_name.clone(),
            self.font_size,
            self.leading,
            self.rise,
        );

        if let Some(m) = form.matrix {
            self.ctm = Matrix::from_array(m).concat(&self.ctm);
        }
        self.fonts.extend(font_names(form.fonts));
        for op in &ops {
            self.apply(op);
        }
        self.flush_block();

        self.fonts = saved_fonts;
        self.ctm = saved_ctm;
        self.ctm_stack.truncate(saved_depth);
        (
            self.font_resource,
            self.font_name,
            self.font_size,
            self.leading,
            self.rise,
        ) = saved_text;
        if let Some(id) = form.id {
            self.active_forms.remove(&id);
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix.translate(tx, ty);
        self.text_matrix = self.line_matrix;
        self.moved = true;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.backend
            .decode_text(self.page_id, &self.font_resource, bytes)
    }

    /// Decode a `TJ` array, turning wide negative adjustments into spaces.
    fn decode_array(&self, items: &[PdfValue]) -> String {
        let mut combined = String::new();
        for item in items {
            match item {
                PdfValue::Str(bytes) => combined.push_str(&self.decode(bytes)),
                other => {
                    let Some(adjustment) = other.as_number().map(|n| -n) else {
                        continue;
                    };
                    if adjustment > TJ_SPACE_THRESHOLD && needs_space_after(&combined) {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        if text.is_empty() {
            return;
        }

        let render = self.text_matrix.concat(&self.ctm);
        let font_size = self.font_size * self.text_matrix.vertical_scale() * self.ctm.vertical_scale();
        let y = render.f;

        let tolerance = (font_size * 0.3).abs();
        if let Some(line_y) = self.line_y {
            if (y - line_y).abs() > tolerance {
                self.flush_line();
            }
        }
        if self.line_y.is_none() {
            self.line_y = Some(y);
        }

        let mut flags = StyleFlags::from_font_name(&self.font_name);
        if self.rise > 0.0 {
            flags |= StyleFlags::SUPERSCRIPT;
        }
        let span = TextSpan::new(text, font_size, self.font_name.clone(), self.page_index)
            .with_flags(flags);

        let moved = std::mem::take(&mut self.moved);
        if let Some(last) = self.spans.last_mut().filter(|last| last.same_style(&span)) {
            if moved && needs_space_after(&last.text) && needs_space_before(&span.text) {
                last.text.push(' ');
            }
            last.text.push_str(&span.text);
            return;
        }
        self.spans.push(span);
    }

    fn flush_line(&mut self) {
        if !self.spans.is_empty() {
            self.lines
                .push(TextLine::new(std::mem::take(&mut self.spans)));
        }
        self.line_y = None;
    }

    fn flush_block(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.page.push_lines(std::mem::take(&mut self.lines));
        }
    }

    fn finish(mut self) -> PageLayout {
        self.flush_block();
        self.page
    }
}

fn needs_space_after(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

fn needs_space_before(text: &str) -> bool {
    match text.chars().next() {
        Some(c) => !c.is_whitespace() && !is_spaceless_script_char(c),
        None => false,
    }
}

/// An affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_array([a, b, c, d, e, f]: [f32; 6]) -> Matrix {
        Matrix { a, b, c, d, e, f }
    }

    fn from_operands(op: &ContentOp) -> Option<Matrix> {
        Some(Matrix {
            a: op.number(0)?,
            b: op.number(1)?,
            c: op.number(2)?,
            d: op.number(3)?,
            e: op.number(4)?,
            f: op.number(5)?,
        })
    }

    /// `self × other`.
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Pre-multiply by a translation.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    /// Length of the transformed unit y vector.
    fn vertical_scale(&self) -> f32 {
        if self.c == 0.0 {
            self.d.abs()
        } else {
            (self.c * self.c + self.d * self.d).sqrt()
        }
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
