use std::env;
use url::Url;

const DEFAULT_BACKEND_URL: &str = "https://api.agentpay.dev";
const DEFAULT_PORT: u16 = 4021;
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Which behavior the gateway exhibits, resolved once at startup and
/// immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Sandbox,
    Production,
}

impl GatewayMode {
    /// Either flag alone forces sandbox behavior (OR, not XOR).
    pub fn from_flags(sandbox: bool, demo: bool) -> Self {
        if sandbox || demo {
            GatewayMode::Sandbox
        } else {
            GatewayMode::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Sandbox => "sandbox",
            GatewayMode::Production => "production",
        }
    }
}

#[derive(Clone)]
pub struct GatewayConfig {
    /// Resolved process-wide mode
    pub mode: GatewayMode,
    /// Payment backend base URL (production mode)
    pub backend_url: String,
    /// Server port
    pub port: u16,
    /// Outbound backend call timeout, seconds
    pub backend_timeout_secs: u64,
    /// CORS allowed origins
    pub allowed_origins: Vec<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("mode", &self.mode)
            .field("backend_url", &self.backend_url)
            .field("port", &self.port)
            .field("backend_timeout_secs", &self.backend_timeout_secs)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Mode: two independent flags, OR'd together
        let mode = GatewayMode::from_flags(env_flag("GATEWAY_SANDBOX"), env_flag("DEMO_MODE"));

        // Optional: backend base URL
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        // Validate URL
        Url::parse(&backend_url).map_err(|_| ConfigError::InvalidUrl(backend_url.clone()))?;

        // Optional: port
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        // Optional: backend call timeout
        let backend_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS);

        // Optional: allowed origins
        let allowed_origins: Vec<String> = env::var("ALLOWED_ORIGINS")
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        if mode == GatewayMode::Production && env::var("BACKEND_URL").is_err() {
            tracing::warn!(
                "BACKEND_URL not set — production mode will forward to the default backend {}",
                DEFAULT_BACKEND_URL
            );
        }

        Ok(Self {
            mode,
            backend_url,
            port,
            backend_timeout_secs,
            allowed_origins,
        })
    }

    /// A config suitable for in-process tests: sandbox mode, no real backend.
    pub fn sandbox_for_tests() -> Self {
        Self {
            mode: GatewayMode::Sandbox,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            port: 0,
            backend_timeout_secs: 1,
            allowed_origins: vec![],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
