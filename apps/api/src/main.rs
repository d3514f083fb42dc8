mod auth;
mod config;
mod errors;
mod llm_client;
mod media;
mod models;
mod orchestrator;
mod routes;
mod state;
mod storage;
mod tools;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::orchestrator::session::{ChatSession, Orchestrator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("careeros_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerOS API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("Gemini client initialized (model: {})", llm_client::MODEL_PRO);

    // The orchestrator drives every chat turn through the transport seam.
    let orchestrator = Orchestrator::new(Arc::new(llm.clone()));

    // Profile persistence
    let profiles = ProfileStore::new(config.data_dir.clone());

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        orchestrator,
        session: Arc::new(Mutex::new(ChatSession::new())),
        profiles,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
