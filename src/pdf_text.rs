//! Page text recovered from PDF bytes.
//!
//! The extraction engine only ever sees plain text, so the PDF parser sits
//! behind [`PdfTextExtractor`]. Production uses [`PdfExtractBackend`]; tests
//! plug in a stub that needs no real PDF files.

use std::panic::{self, AssertUnwindSafe};

use log::debug;

const FORM_FEED: char = '\x0C';

#[derive(Debug, thiserror::Error)]
pub enum PdfTextError {
    #[error("Not a PDF document")]
    NotPdf,
    #[error("Failed to read PDF text: {0}")]
    Parse(String),
    #[error("PDF parser crashed: {0}")]
    Panicked(String),
}

pub trait PdfTextExtractor: Send + Sync {
    /// Text of every page, in page order.
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>, PdfTextError>;

    /// All non-blank pages joined with a newline.
    fn full_text(&self, data: &[u8]) -> Result<String, PdfTextError> {
        let pages = self.page_texts(data)?;
        Ok(join_pages(&pages))
    }
}

pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(String::as_str)
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `pdf-extract` backed implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfTextExtractor for PdfExtractBackend {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>, PdfTextError> {
        if !data.starts_with(b"%PDF") {
            return Err(PdfTextError::NotPdf);
        }

        // pdf-extract panics on some malformed fonts and encodings.
        let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(data)))
            .map_err(|payload| PdfTextError::Panicked(panic_message(payload.as_ref())))?
            .map_err(|e| PdfTextError::Parse(e.to_string()))?;

        let pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
        debug!("Recovered text from {} page(s), {} bytes", pages.len(), text.len());
        Ok(pages)
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
