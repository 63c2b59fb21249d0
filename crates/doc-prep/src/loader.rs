//! Reads uploaded documents (TXT, PDF, DOCX) into plain text.

use std::fs;
use std::path::Path;

use crate::error::{DocPrepError, Result};
use crate::pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "txt" | "md" => Ok(DocumentFormat::Text),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(DocPrepError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| DocPrepError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the text of a TXT, PDF or DOCX file.
pub fn load_document(path: &Path) -> Result<String> {
    let text = match DocumentFormat::from_path(path)? {
        DocumentFormat::Text => String::from_utf8(read(path)?).map_err(|_| {
            DocPrepError::Extract(format!("{} is not valid UTF-8", path.display()))
        })?,
        DocumentFormat::Pdf => pdf::extract_text(&read(path)?)?,
        DocumentFormat::Docx => docx_lite::extract_text(path).map_err(|e| {
            DocPrepError::Extract(format!(
                "Failed to extract text from DOCX {}: {}",
                path.display(),
                e
            ))
        })?,
    };
    log::debug!("Loaded {} ({} chars)", path.display(), text.len());
    Ok(text)
}
