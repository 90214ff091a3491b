use std::path::PathBuf;

use tracing::info;

use crate::embedding::EmbeddingProvider;
use crate::errors::AppError;
use crate::screening::normalizer::normalize_batch;
use crate::screening::ranker::{rank_resumes, RankOptions, RankedResume};

/// Outcome of one screening run.
#[derive(Debug)]
pub struct ScreeningResult {
    /// Resumes that entered the ranking, before any policy drop or cut.
    pub considered: usize,
    pub top_matches: Vec<RankedResume>,
}

/// Runs the full screening flow over staged files: extract text from every
/// document, then rank the resumes against the job description.
///
/// Extraction does blocking file I/O and CPU-bound parsing, so it runs on
/// the blocking pool rather than a runtime worker.
pub async fn run_screening(
    resume_paths: Vec<PathBuf>,
    job_description_path: PathBuf,
    options: RankOptions,
    embedder: &dyn EmbeddingProvider,
) -> Result<ScreeningResult, AppError> {
    let batch =
        tokio::task::spawn_blocking(move || normalize_batch(&resume_paths, &job_description_path))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))??;

    info!(
        "Normalized batch: {} resumes, job description of {} chars",
        batch.resumes.len(),
        batch.job_description.len()
    );

    let considered = batch.resumes.len();
    let top_matches = rank_resumes(batch.resumes, &batch.job_description, &options, embedder).await?;

    Ok(ScreeningResult {
        considered,
        top_matches,
    })
}
