use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::{extract_text, ExtractionError};

/// One resume reduced to its extracted text. `filename` is the basename of
/// the staged file; `text` may be empty when the document had no extractable
/// content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub filename: String,
    pub text: String,
}

/// A fully normalized upload batch: the job description as plain text plus
/// one record per resume, in input order.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub job_description: String,
    pub resumes: Vec<ResumeRecord>,
}

/// Extracts text from every resume and from the job description.
///
/// Fail-fast: the first unsupported or unparseable file aborts the whole
/// batch with no partial results, so no candidate is ever silently dropped.
pub fn normalize_batch(
    resume_paths: &[PathBuf],
    job_description_path: &Path,
) -> Result<NormalizedBatch, ExtractionError> {
    let mut resumes = Vec::with_capacity(resume_paths.len());
    for path in resume_paths {
        let text = extract_text(path)?;
        debug!("Extracted {} chars from {}", text.len(), path.display());
        resumes.push(ResumeRecord {
            filename: basename(path),
            text,
        });
    }

    let job_description = extract_text(job_description_path)?;
    debug!(
        "Extracted {} chars from job description {}",
        job_description.len(),
        job_description_path.display()
    );

    Ok(NormalizedBatch {
        job_description,
        resumes,
    })
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
