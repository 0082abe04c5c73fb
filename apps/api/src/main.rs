mod ai;
mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::{select_provider, FallbackAi};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::MemStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // In-memory store: all interviews are lost on restart
    let store = Arc::new(MemStorage::new());

    // Resolve the AI provider once; every call falls back to canned data on failure
    let provider = select_provider(&config.ai_provider)?;
    let ai = FallbackAi::new(provider);
    info!("Interview AI ready (provider: {})", ai.provider_name());

    let state = AppState::new(store, ai);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
