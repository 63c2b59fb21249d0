//! Trim, extract, OCR fallback and highlighting for one uploaded PDF.

use crate::error::Result;
use crate::highlight::highlight_keywords;
use crate::ocr::OcrEngine;
use crate::pdf;
use crate::range::PageRange;

pub const DEFAULT_MIN_CHARS_PER_PAGE: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    pub text: String,
    /// Pages kept after trimming.
    pub pages: u32,
    pub used_ocr: bool,
}

pub struct DocumentProcessor {
    ocr: Option<Box<dyn OcrEngine>>,
    min_chars_per_page: usize,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor {
    /// A processor without OCR.
    pub fn new() -> Self {
        Self {
            ocr: None,
            min_chars_per_page: DEFAULT_MIN_CHARS_PER_PAGE,
        }
    }

    pub fn with_ocr(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    pub fn with_min_chars_per_page(mut self, min_chars: usize) -> Self {
        self.min_chars_per_page = min_chars;
        self
    }

    /// Processes `bytes` restricted to `range` (the whole document when
    /// `None`). An invalid range is an error; extraction and OCR failures
    /// are logged and degrade to whatever text is available.
    pub fn process(
        &self,
        bytes: &[u8],
        range: Option<PageRange>,
        keywords: &str,
    ) -> Result<ProcessedDocument> {
        let total = pdf::page_count(bytes)?;
        let range = range.unwrap_or(PageRange::full(total));
        range.validate(total)?;

        let trimmed;
        let pdf_bytes = if range == PageRange::full(total) {
            bytes
        } else {
            trimmed = pdf::trim(bytes, range)?;
            trimmed.as_slice()
        };

        let mut text = match pdf::extract_text(pdf_bytes) {
            Ok(text) => text,
            Err(e) => {
                log::error!("{}", e);
                String::new()
            }
        };

        let mut used_ocr = false;
        let threshold = self.min_chars_per_page * range.len() as usize;
        if text.trim().chars().count() < threshold {
            if let Some(engine) = &self.ocr {
                log::info!(
                    "Low text content detected ({} chars for {} pages), attempting OCR with {}",
                    text.trim().chars().count(),
                    range.len(),
                    engine.name()
                );
                match engine.recognize(pdf_bytes) {
                    Ok(ocr_text) if !ocr_text.trim().is_empty() => {
                        text = ocr_text;
                        used_ocr = true;
                    }
                    Ok(_) => log::warn!("OCR produced no text, keeping extracted text"),
                    Err(e) => log::warn!("Could not perform OCR: {}", e),
                }
            }
        }

        Ok(ProcessedDocument {
            text: highlight_keywords(&text, keywords),
            pages: range.len(),
            used_ocr,
        })
    }
}
