use std::path::Path;

use super::ExtractionError;

/// Extracts text from a PDF file via `pdf-extract`.
pub(crate) fn extract(path: &Path) -> Result<String, ExtractionError> {
    pdf_extract::extract_text(path).map_err(|source| ExtractionError::Pdf {
        path: path.display().to_string(),
        source,
    })
}
