use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::screening::normalizer::ResumeRecord;

/// Shortlist size when neither the request nor the environment overrides it.
pub const DEFAULT_TOP_N: usize = 5;

/// A resume with its similarity score attached. Carries the original record
/// fields so callers can still render or inspect the matched text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResume {
    pub filename: String,
    pub text: String,
    pub score: f32,
}

/// What to do with a resume whose text produced no embedding.
///
/// `ZeroScore` keeps it visible at the bottom of the ranking; `Exclude`
/// drops it from the result entirely. Zero-scoring is the default: the
/// resume was considered, and hiding it would look like it was never
/// uploaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingEmbeddingPolicy {
    #[default]
    ZeroScore,
    Exclude,
}

impl FromStr for MissingEmbeddingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero_score" => Ok(MissingEmbeddingPolicy::ZeroScore),
            "exclude" => Ok(MissingEmbeddingPolicy::Exclude),
            other => Err(format!(
                "Unknown missing-embedding policy '{other}' (expected 'zero_score' or 'exclude')"
            )),
        }
    }
}

/// Knobs for a single ranking call.
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    pub top_n: usize,
    pub missing_embedding: MissingEmbeddingPolicy,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            missing_embedding: MissingEmbeddingPolicy::default(),
        }
    }
}

/// Ranks `resumes` by cosine similarity to `job_description` and returns
/// the top `options.top_n`, highest score first.
///
/// The job description embeds once; each resume embeds through the same
/// provider, so every score compares vectors from a single model. A job
/// description that is empty after trimming (or that the provider cannot
/// embed) admits no meaningful comparison and yields an empty shortlist
/// rather than an error. A resume without an embedding is scored 0.0 or
/// dropped per `options.missing_embedding`. Equal scores keep their input
/// order. Provider transport failures propagate unmodified and abort the
/// whole call; no partially ranked shortlist is ever returned.
pub async fn rank_resumes(
    resumes: Vec<ResumeRecord>,
    job_description: &str,
    options: &RankOptions,
    embedder: &dyn EmbeddingProvider,
) -> Result<Vec<RankedResume>, EmbeddingError> {
    if job_description.trim().is_empty() {
        debug!("Empty job description, nothing to rank against");
        return Ok(Vec::new());
    }

    let Some(jd_vector) = embedder.embed(job_description).await? else {
        debug!("Job description produced no embedding, nothing to rank against");
        return Ok(Vec::new());
    };

    info!(
        "Ranking {} resumes against the job description (model: {})",
        resumes.len(),
        embedder.model_id()
    );

    let mut ranked = Vec::with_capacity(resumes.len());
    for resume in resumes {
        let score = match embedder.embed(&resume.text).await? {
            Some(vector) => cosine_similarity(&jd_vector, &vector),
            None => match options.missing_embedding {
                MissingEmbeddingPolicy::ZeroScore => 0.0,
                MissingEmbeddingPolicy::Exclude => {
                    debug!("Excluding '{}': no embedding for its text", resume.filename);
                    continue;
                }
            },
        };

        ranked.push(RankedResume {
            filename: resume.filename,
            text: resume.text,
            score,
        });
    }

    // Vec::sort_by is stable, so equal scores keep their input order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(options.top_n);

    Ok(ranked)
}

/// Cosine similarity between two vectors, accumulated in f64 for precision.
///
/// Degenerate inputs (empty, mismatched dimensions, zero norm) score 0.0: a
/// zero vector carries no directional information to compare against.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    (dot / denominator) as f32
}
