//! Document pre-processing: page ranges, PDF trimming and text extraction,
//! OCR fallback, keyword highlighting and TXT/PDF/DOCX loading.

pub mod error;
pub mod highlight;
pub mod loader;
pub mod ocr;
pub mod pdf;
pub mod processor;
pub mod range;

pub use error::{DocPrepError, Result};
pub use highlight::{highlight_keywords, parse_keywords};
pub use loader::{load_document, DocumentFormat};
pub use ocr::{OcrEngine, TesseractOcr};
pub use processor::{DocumentProcessor, ProcessedDocument};
pub use range::PageRange;
