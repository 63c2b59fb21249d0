//! OCR fallback for image-only PDFs.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{DocPrepError, Result};

/// Recognizes text in every page of a PDF.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Returns one string per page, in page order.
    fn recognize_pages(&self, pdf: &[u8]) -> Result<Vec<String>>;

    /// Recognizes all pages and joins them with page markers.
    fn recognize(&self, pdf: &[u8]) -> Result<String> {
        Ok(format_pages(&self.recognize_pages(pdf)?))
    }
}

/// `"\n--- Page {n} ---\n{text}"` for every page, concatenated.
pub fn format_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("\n--- Page {} ---\n{}", i + 1, text.as_ref()))
        .collect()
}

/// Rasterizes pages with `pdftoppm` (poppler-utils) and reads each image
/// with the `tesseract` CLI.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pdftoppm: PathBuf,
    tesseract: PathBuf,
    dpi: u32,
    language: Option<String>,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            pdftoppm: PathBuf::from("pdftoppm"),
            tesseract: PathBuf::from("tesseract"),
            dpi: 200,
            language: None,
        }
    }
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_binaries(mut self, pdftoppm: impl Into<PathBuf>, tesseract: impl Into<PathBuf>) -> Self {
        self.pdftoppm = pdftoppm.into();
        self.tesseract = tesseract.into();
        self
    }

    /// True when both external tools can be launched.
    pub fn is_available(&self) -> bool {
        [&self.pdftoppm, &self.tesseract]
            .iter()
            .all(|tool| Command::new(tool).arg("-v").output().is_ok())
    }

    fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");
        let output = run(
            &self.pdftoppm,
            Command::new(&self.pdftoppm)
                .arg("-r")
                .arg(self.dpi.to_string())
                .arg("-png")
                .arg(pdf_path)
                .arg(&prefix),
            "install poppler-utils",
        )?;
        if !output.status.success() {
            return Err(DocPrepError::Ocr(format!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let read_dir = |dir: &Path| -> io::Result<Vec<PathBuf>> {
            let mut images = Vec::new();
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension() == Some(OsStr::new("png")) {
                    images.push(path);
                }
            }
            Ok(images)
        };
        let mut images = read_dir(out_dir).map_err(|source| DocPrepError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;
        // pdftoppm zero-pads page numbers uniformly, so name order is page order.
        images.sort();
        Ok(images)
    }

    fn read_image(&self, image: &Path) -> Result<String> {
        let mut command = Command::new(&self.tesseract);
        command.arg(image).arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        let output = run(&self.tesseract, &mut command, "install tesseract-ocr")?;
        if !output.status.success() {
            return Err(DocPrepError::Ocr(format!(
                "tesseract failed on {}: {}",
                image.display(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn run(tool: &Path, command: &mut Command, hint: &str) -> Result<Output> {
    command.output().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DocPrepError::ToolUnavailable {
            tool: tool.display().to_string(),
            hint: hint.to_string(),
        },
        _ => DocPrepError::Ocr(format!("failed to run {}: {}", tool.display(), e)),
    })
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize_pages(&self, pdf: &[u8]) -> Result<Vec<String>> {
        let work_dir = tempfile::tempdir().map_err(|source| DocPrepError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
        let pdf_path = work_dir.path().join("input.pdf");
        fs::write(&pdf_path, pdf).map_err(|source| DocPrepError::Io {
            path: pdf_path.clone(),
            source,
        })?;

        let images_dir = work_dir.path().join("pages");
        fs::create_dir(&images_dir).map_err(|source| DocPrepError::Io {
            path: images_dir.clone(),
            source,
        })?;

        let images = self.rasterize(&pdf_path, &images_dir)?;
        log::debug!("OCR: rasterized {} page(s) at {} dpi", images.len(), self.dpi);

        images.iter().map(|image| self.read_image(image)).collect()
    }
}
