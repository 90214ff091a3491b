//! Embedding acquisition: the single seam through which text becomes vectors.
//!
//! ARCHITECTURAL RULE: no other module may call an embeddings API directly.
//! The ranker receives an `Arc<dyn EmbeddingProvider>` from `AppState`, so
//! unit tests run against deterministic stubs instead of the network.

use async_trait::async_trait;
use thiserror::Error;

pub mod openai;

pub use openai::{OpenAiEmbedder, EMBEDDING_MODEL};

/// A fixed-length vector representation of a text, produced by one model.
/// Either fully present or absent; never partially computed.
pub type EmbeddingVector = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embeddings API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Embeddings API returned no vector")]
    MissingVector,
}

/// The embedding capability the ranker depends on.
///
/// `embed` returns `Ok(None)` for text that is empty after trimming; there
/// is nothing to embed and callers treat the result as "no comparison
/// possible". All vectors from one provider share a single model identity
/// and dimensionality; vectors from different models are never compared.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbeddingError>;

    /// The model identifier behind every vector this provider returns.
    fn model_id(&self) -> &str;
}
