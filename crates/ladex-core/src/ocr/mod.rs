//! Document text acquisition.
//!
//! PDFs are tried as embedded text first; scanned PDFs are rendered with
//! `pdftoppm` and read page by page with the Tesseract CLI. Plain images go
//! straight to Tesseract. Both binaries must be on PATH for scanned input.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::OcrError;

/// Source of raw text for a document file.
pub trait TextSource {
    fn recognize(&self, path: &Path) -> Result<String, OcrError>;
}

/// Default reader backed by pdf-extract and the Tesseract CLI.
pub struct DocumentReader {
    tesseract_path: String,
    poppler_path: String,
    language: String,
    render_dpi: u32,
    /// Embedded PDF text shorter than this falls through to OCR.
    min_text_length: usize,
}

impl DocumentReader {
    pub fn new() -> Self {
        Self {
            tesseract_path: "tesseract".to_string(),
            poppler_path: "pdftoppm".to_string(),
            language: "eng".to_string(),
            render_dpi: 300,
            min_text_length: 50,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_render_dpi(mut self, dpi: u32) -> Self {
        self.render_dpi = dpi;
        self
    }

    fn recognize_pdf(&self, path: &Path) -> Result<String, OcrError> {
        let data = std::fs::read(path)?;

        match pdf_extract::extract_text_from_mem(&data) {
            Ok(text) if text.trim().len() >= self.min_text_length => {
                debug!(path = %path.display(), "using embedded PDF text");
                return Ok(text);
            }
            Ok(_) => debug!(path = %path.display(), "embedded text too short, rendering pages"),
            Err(e) => debug!(path = %path.display(), error = %e, "no embedded text, rendering pages"),
        }

        self.ocr_rendered_pages(path)
    }

    fn ocr_rendered_pages(&self, path: &Path) -> Result<String, OcrError> {
        let dir = tempfile::tempdir().map_err(OcrError::Read)?;
        let prefix = dir.path().join("page");

        let output = Command::new(&self.poppler_path)
            .arg("-r")
            .arg(self.render_dpi.to_string())
            .arg("-png")
            .arg(path)
            .arg(&prefix)
            .output()
            .map_err(|e| OcrError::Pdf(format!("failed to run {}: {e}", self.poppler_path)))?;
        if !output.status.success() {
            return Err(OcrError::Pdf(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut pages: Vec<PathBuf> = std::fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|e| e == "png"))
            .collect();
        pages.sort();
        if pages.is_empty() {
            return Err(OcrError::Pdf("no pages rendered".to_string()));
        }

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            texts.push(self.run_tesseract(page)?);
        }

        let text = texts.join("\n\n");
        if text.trim().is_empty() {
            return Err(OcrError::NoText);
        }
        Ok(text)
    }

    fn run_tesseract(&self, path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.tesseract_path)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| {
                OcrError::Engine(format!(
                    "failed to run {} (is it installed?): {e}",
                    self.tesseract_path
                ))
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for DocumentReader {
    fn recognize(&self, path: &Path) -> Result<String, OcrError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => self.recognize_pdf(path),
            "png" | "jpg" | "jpeg" => {
                let text = self.run_tesseract(path)?;
                if text.trim().is_empty() {
                    return Err(OcrError::NoText);
                }
                Ok(text)
            }
            other => Err(OcrError::UnsupportedFormat(other.to_string())),
        }
    }
}
