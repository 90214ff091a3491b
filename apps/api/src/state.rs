use std::sync::Arc;

use crate::config::Config;
use crate::embedding::EmbeddingProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable embedding capability. Production wires `OpenAiEmbedder`;
    /// tests wire deterministic stubs.
    pub embedder: Arc<dyn EmbeddingProvider>,
}
