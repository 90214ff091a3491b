//! Text extraction: turns PDF and DOCX documents into plain text.
//!
//! Formats are dispatched on the file extension. Adding a format means adding
//! a `DocumentFormat` variant and a handler module; nothing downstream of the
//! returned text changes.

use std::path::Path;

use thiserror::Error;

mod docx;
mod pdf;

/// A document format the extractor knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the path's extension, case-insensitively.
    /// Returns `None` for anything outside the supported set.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF '{path}': {source}")]
    Pdf {
        path: String,
        #[source]
        source: pdf_extract::OutputError,
    },

    #[error("Failed to extract text from DOCX '{path}': {reason}")]
    Docx { path: String, reason: String },
}

/// Extracts plain text from a single file based on its extension.
///
/// The whole call fails on an unsupported extension or an unparseable
/// document; callers processing batches are expected to abort rather than
/// silently skip the offending file.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Pdf) => pdf::extract(path),
        Some(DocumentFormat::Docx) => docx::extract(path),
        None => Err(ExtractionError::UnsupportedFormat {
            extension: extension_label(path),
        }),
    }
}

fn extension_label(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| "(none)".to_string())
}
