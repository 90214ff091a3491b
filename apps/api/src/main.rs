mod config;
mod embedding;
mod errors;
mod extraction;
mod routes;
mod screening;
mod staging;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{OpenAiEmbedder, EMBEDDING_MODEL};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging. Tracing targets use underscores, the
    // package name uses a dash.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Staging area for uploaded batches
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "creating upload directory {}",
                config.upload_dir.display()
            )
        })?;
    info!("Staging uploads under {}", config.upload_dir.display());

    // Initialize the embedding provider
    let embedder = Arc::new(OpenAiEmbedder::new(config.openai_api_key.clone()));
    info!("Embedding provider initialized (model: {EMBEDDING_MODEL})");

    // Build app state
    let state = AppState {
        config: config.clone(),
        embedder,
    };

    // Build router
    let cors = cors_layer(&config.allowed_origin)?;
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS pinned to the configured frontend origin; uploads come from the
/// browser.
fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = allowed_origin
        .parse()
        .with_context(|| format!("ALLOWED_ORIGIN '{allowed_origin}' is not a valid origin"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}
