//! Application state.

use std::sync::Arc;

use omnihub_store::RocksStore;
use omnihub_tools::ToolSet;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// External tool adapters.
    pub tools: Arc<ToolSet>,
}

impl AppState {
    /// Create a new application state, building the adapter set from config.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        if config.tools.eyecon_auth.is_none() {
            tracing::warn!("Eyecon auth headers not configured - lookups will run in safe mode");
        }

        let tools = Arc::new(ToolSet::new(&config.tools));
        Self {
            store,
            config,
            tools,
        }
    }
}
