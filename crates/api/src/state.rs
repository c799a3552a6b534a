use std::sync::Arc;

use stagecraft_llm::api::CompletionApi;
use stagecraft_llm::config::LlmConfig;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// In-memory entity store.
    pub pool: stagecraft_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Client for the upstream completion API. Holds the only copy of the key.
    pub llm: CompletionApi,
    pub llm_config: Arc<LlmConfig>,
}

impl AppState {
    pub fn new(pool: stagecraft_db::DbPool, config: ServerConfig, llm_config: LlmConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            llm: CompletionApi::from_config(&llm_config),
            llm_config: Arc::new(llm_config),
        }
    }
}
