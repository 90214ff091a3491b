use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::screening::ranker::{MissingEmbeddingPolicy, DEFAULT_TOP_N};

/// Application configuration loaded from environment variables.
/// Loading fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub default_top_n: usize,
    pub missing_embedding_policy: MissingEmbeddingPolicy,
    pub allowed_origin: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            default_top_n: std::env::var("DEFAULT_TOP_N")
                .unwrap_or_else(|_| DEFAULT_TOP_N.to_string())
                .parse::<usize>()
                .context("DEFAULT_TOP_N must be a non-negative integer")?,
            missing_embedding_policy: std::env::var("MISSING_EMBEDDING_POLICY")
                .unwrap_or_else(|_| "zero_score".to_string())
                .parse()
                .map_err(anyhow::Error::msg)
                .context("MISSING_EMBEDDING_POLICY must be 'zero_score' or 'exclude'")?,
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
