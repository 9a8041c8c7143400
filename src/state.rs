use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::convai::ConvaiConfig;

/// Application state shared by all handlers
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self { config })
    }

    /// Conversational AI settings for a new relay session
    pub fn convai_config(&self) -> ConvaiConfig {
        self.config.convai_config()
    }
}
