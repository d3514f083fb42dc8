use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::orchestrator::session::{ChatSession, Orchestrator};
use crate::storage::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Direct client handle for the image-generation collaborator; all chat
    /// turns go through the orchestrator instead.
    pub llm: GeminiClient,
    pub orchestrator: Orchestrator,
    /// The single chat session. `try_lock` at the route boundary is what
    /// rejects a send while a prior chain is outstanding.
    pub session: Arc<Mutex<ChatSession>>,
    pub profiles: ProfileStore,
}
