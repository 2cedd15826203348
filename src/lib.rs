pub mod backend;
pub mod config;
pub mod cors;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod session;
pub mod signature;
pub mod state;

pub use config::{GatewayConfig, GatewayMode};
pub use error::GatewayError;
pub use state::AppState;
