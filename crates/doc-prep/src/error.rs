use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocPrepError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Text extraction failed: {0}")]
    Extract(String),

    #[error("{tool} is not available ({hint})")]
    ToolUnavailable { tool: String, hint: String },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("Unsupported file type: {0}. Supported types: txt, pdf, docx")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, DocPrepError>;
