use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::handlers::{select_handlers, ModeHandlers};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// Handler set selected once at startup by the resolved mode
    pub handlers: Arc<dyn ModeHandlers>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.backend_timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        let handlers = select_handlers(&config, http_client);

        Self {
            config: Arc::new(config),
            handlers,
        }
    }
}
