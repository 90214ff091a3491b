use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::multipart::Field;
use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;

/// One file pulled out of the multipart form: a safe basename plus the raw
/// bytes.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Reads a multipart field into memory. Only the basename of the
    /// client-supplied filename is kept; path components never reach disk.
    pub async fn from_field(field: Field<'_>) -> Result<Self, AppError> {
        let raw_name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("File field is missing a filename".to_string()))?;
        let filename = sanitize_filename(&raw_name)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?;

        Ok(UploadedFile { filename, bytes })
    }
}

/// Staged locations for one upload batch.
#[derive(Debug)]
pub struct StagedBatch {
    pub batch_id: Uuid,
    pub resume_paths: Vec<PathBuf>,
    pub job_description_path: PathBuf,
}

/// Writes an upload batch under `<upload_root>/<batch-id>/`.
///
/// Files keep their sanitized basenames inside a fresh per-batch directory,
/// so concurrent uploads never collide with each other. Duplicate basenames
/// within one batch (the job description included) are rejected before
/// anything touches disk: the later write would clobber the earlier file and
/// silently drop a candidate.
pub async fn stage_batch(
    upload_root: &Path,
    resumes: &[UploadedFile],
    job_description: &UploadedFile,
) -> Result<StagedBatch, AppError> {
    let mut seen = HashSet::new();
    for file in resumes.iter().chain(std::iter::once(job_description)) {
        if !seen.insert(file.filename.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate filename in batch: '{}'",
                file.filename
            )));
        }
    }

    let batch_id = Uuid::new_v4();
    let batch_dir = upload_root.join(batch_id.to_string());
    fs::create_dir_all(&batch_dir)
        .await
        .with_context(|| format!("creating staging directory {}", batch_dir.display()))?;

    let mut resume_paths = Vec::with_capacity(resumes.len());
    for file in resumes {
        resume_paths.push(write_staged(&batch_dir, file).await?);
    }
    let job_description_path = write_staged(&batch_dir, job_description).await?;

    Ok(StagedBatch {
        batch_id,
        resume_paths,
        job_description_path,
    })
}

async fn write_staged(batch_dir: &Path, file: &UploadedFile) -> Result<PathBuf, AppError> {
    let path = batch_dir.join(&file.filename);
    fs::write(&path, &file.bytes)
        .await
        .with_context(|| format!("staging upload {}", path.display()))?;
    Ok(path)
}

/// Reduces a client-supplied filename to its final path component and
/// rejects names that would escape or vanish.
fn sanitize_filename(raw: &str) -> Result<String, AppError> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::Validation(format!("Invalid filename: '{raw}'")));
    }
    Ok(name.to_string())
}
