//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for PDF operations, isolating
//! the concrete PDF library (lopdf) from the layout extraction logic.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::Metadata;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Font information returned by the backend.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Font resource name (key in the page's font dictionary).
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold").
    pub base_font: String,
}

/// A Form XObject ready to be painted.
#[derive(Debug, Clone)]
pub struct FormXObject {
    /// Object the form stream lives in, if it is indirect.
    pub id: Option<PageId>,
    /// Decompressed content stream.
    pub content: Vec<u8>,
    /// The form's `/Matrix`, identity when absent.
    pub matrix: Option<[f32; 6]>,
    /// Fonts declared in the form's own Resources.
    pub fonts: Vec<BackendFontInfo>,
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(PdfValue::as_number)
    }
}

/// What the layout extractor needs from a PDF library.
///
/// [`LopdfBackend`] is the production implementation; tests drive the
/// extractor with in-memory mocks.
pub trait PdfBackend {
    /// Pages keyed by 1-based page number.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Fonts in the page's resource dictionary.
    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>>;

    /// The page's content streams, concatenated and decompressed.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Tokenize content stream bytes into operators with operands.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Turn a shown string into text using the encoding of `font_name`.
    ///
    /// Never fails: unknown fonts fall back to [`decode_text_simple`].
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// Whether the named XObject on a page is an image.
    fn is_image_xobject(&self, page: PageId, name: &[u8]) -> bool;

    /// The named XObject on a page, if it is a form.
    ///
    /// Backends without form support paint nothing for `Do` on a form.
    fn form_xobject(&self, _page: PageId, _name: &[u8]) -> Result<Option<FormXObject>> {
        Ok(None)
    }

    /// Document metadata from the Info dictionary.
    fn metadata(&self) -> Metadata;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with byte order mark
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Open a PDF on disk.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Parse a PDF held in memory.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Read a whole PDF from `reader`, then parse it.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        Self { doc }
    }

    /// Whether the trailer carries an Encrypt dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Header version, e.g. `1.7`.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Follow one level of indirection to a dictionary.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Stream of the named XObject in the page's resources.
    fn xobject_stream(&self, page: PageId, name: &[u8]) -> Option<(Option<PageId>, &Stream)> {
        let xobjects = self
            .page_resources(page)
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|x| self.resolve_dict(x))?;

        match xobjects.get(name).ok()? {
            Object::Reference(id) => match self.doc.get_object(*id).ok()? {
                Object::Stream(stream) => Some((Some(*id), stream)),
                _ => None,
            },
            Object::Stream(stream) => Some((None, stream)),
            _ => None,
        }
    }

    /// Font resources declared directly in a dictionary's `/Font` entry.
    fn declared_fonts(&self, resources: &Dictionary) -> Vec<BackendFontInfo> {
        let Some(fonts) = resources.get(b"Font").ok().and_then(|f| self.resolve_dict(f)) else {
            return Vec::new();
        };
        fonts
            .iter()
            .filter_map(|(name, font)| {
                let base = self.resolve_dict(font)?.get(b"BaseFont").and_then(Object::as_name);
                Some(BackendFontInfo {
                    name: name.clone(),
                    base_font: String::from_utf8_lossy(base.unwrap_or(name.as_slice())).into_owned(),
                })
            })
            .collect()
    }

    /// The page's Resources dictionary, inherited from ancestors if needed.
    fn page_resources(&self, page: PageId) -> Option<&Dictionary> {
        let mut node = self.doc.get_dictionary(page).ok()?;
        loop {
            if let Some(res) = node.get(b"Resources").ok().and_then(|r| self.resolve_dict(r)) {
                return Some(res);
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>> {
        let fonts = self.doc.get_page_fonts(page)?;
        Ok(fonts
            .into_iter()
            .map(|(name, dict)| BackendFontInfo {
                base_font: match dict.get(b"BaseFont").and_then(Object::as_name) {
                    Ok(base) => String::from_utf8_lossy(base).into_owned(),
                    Err(_) => String::from_utf8_lossy(&name).into_owned(),
                },
                name,
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        Ok(self.doc.get_page_content(page)?)
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        let decoded = self.doc.get_page_fonts(page).ok().and_then(|fonts| {
            let encoding = fonts.get(font_name)?.get_font_encoding(&self.doc).ok()?;
            LopdfDocument::decode_text(&encoding, bytes).ok()
        });
        decoded.unwrap_or_else(|| decode_text_simple(bytes))
    }

    fn is_image_xobject(&self, page: PageId, name: &[u8]) -> bool {
        self.xobject_stream(page, name).is_some_and(|(_, stream)| {
            matches!(stream.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Image"))
        })
    }

    fn form_xobject(&self, page: PageId, name: &[u8]) -> Result<Option<FormXObject>> {
        let Some((id, stream)) = self.xobject_stream(page, name) else {
            return Ok(None);
        };
        if !matches!(stream.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Form")) {
            return Ok(None);
        }

        let content = if stream.dict.has(b"Filter") {
            stream.decompressed_content()?
        } else {
            stream.content.clone()
        };
        let matrix = stream
            .dict
            .get(b"Matrix")
            .and_then(Object::as_array)
            .ok()
            .and_then(|items| {
                let values: Vec<f32> = items
                    .iter()
                    .filter_map(|item| convert_object(item).as_number())
                    .collect();
                <[f32; 6]>::try_from(values).ok()
            });
        let fonts = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| self.resolve_dict(r))
            .map(|res| self.declared_fonts(res))
            .unwrap_or_default();

        Ok(Some(FormXObject {
            id,
            content,
            matrix,
            fonts,
        }))
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.doc.get_pages().len() as u32;
        metadata.encrypted = self.doc.is_encrypted();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.resolve_dict(info));

        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
        }

        metadata
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

/// Read a text string entry from a dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}
