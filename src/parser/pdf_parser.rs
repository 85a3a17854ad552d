//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use crate::detect::{detect_header_from_bytes, detect_header_from_path};
use crate::error::{Error, Result};
use crate::model::{LayoutDocument, PageLayout};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LayoutExtractor;
use super::options::{ErrorMode, ParseOptions};

/// An open PDF document.
///
/// The underlying lopdf document is released when the parser is dropped.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        detect_header_from_path(path)?;
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self { backend, options })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_header_from_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self { backend, options })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Lay out every page and return the document.
    pub fn parse(&self) -> Result<LayoutDocument> {
        let mut document = LayoutDocument::new();
        document.metadata = self.backend.metadata();

        let extractor = LayoutExtractor::new(&self.backend);
        for (page_index, (page_num, page_id)) in self.backend.pages().into_iter().enumerate() {
            match extractor.extract_page(page_index, page_id) {
                Ok(page) => document.add_page(page),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::TextExtract(format!("Page {}: {}", page_num, e)));
                    }
                    log::warn!("Failed to lay out page {}: {}", page_num, e);
                    document.add_page(PageLayout::new(page_index));
                }
            }
        }

        Ok(document)
    }

    /// Lay out a single page by its 1-based number.
    pub fn parse_page(&self, page_number: u32) -> Result<PageLayout> {
        let pages = self.backend.pages();
        let total = pages.len() as u32;
        if page_number == 0 || page_number > total {
            return Err(Error::PageOutOfRange(page_number, total));
        }

        let page_index = (page_number - 1) as usize;
        let page_id = pages
            .values()
            .nth(page_index)
            .copied()
            .ok_or(Error::PageOutOfRange(page_number, total))?;
        LayoutExtractor::new(&self.backend).extract_page(page_index, page_id)
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }
}
