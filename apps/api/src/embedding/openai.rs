use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingError, EmbeddingProvider, EmbeddingVector};

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
/// Every vector in the service comes from this model; scores computed from
/// mixed models are meaningless.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: EmbeddingVector,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the OpenAI embeddings API with retry logic for transient
/// failures. This is the production `EmbeddingProvider`.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key }
    }

    /// Fetches an embedding, making up to MAX_RETRIES attempts with
    /// exponential backoff (1s, then 2s) between them on rate limits and
    /// server errors. Client errors (4xx other than 429) fail immediately.
    async fn request_embedding(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: text,
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Embedding request attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(OPENAI_EMBEDDINGS_URL)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embeddings API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|envelope| envelope.error.message)
                    .unwrap_or(body);
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await.map_err(EmbeddingError::Http)?;
            let parsed: EmbeddingResponse = serde_json::from_str(&body)?;
            debug!(
                "Embedding call succeeded: prompt_tokens={}, total_tokens={}",
                parsed.usage.prompt_tokens, parsed.usage.total_tokens
            );

            return parsed
                .data
                .into_iter()
                .next()
                .map(|entry| entry.embedding)
                .ok_or(EmbeddingError::MissingVector);
        }

        Err(last_error.unwrap_or(EmbeddingError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbeddingError> {
        // Empty text has no embedding; skip the network round-trip entirely.
        if text.trim().is_empty() {
            return Ok(None);
        }

        self.request_embedding(text).await.map(Some)
    }

    fn model_id(&self) -> &str {
        EMBEDDING_MODEL
    }
}
