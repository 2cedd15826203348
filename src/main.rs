use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentpay_gateway::{
    config::{GatewayConfig, GatewayMode},
    metrics::register_metrics,
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().expect("Failed to load configuration");
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();

    tracing::info!("Starting agentpay-gateway on port {}", port);
    tracing::info!("Mode: {}", config.mode.as_str());
    match config.mode {
        GatewayMode::Sandbox => {
            tracing::info!("Sandbox mode: all state is in-memory, any credentials are accepted");
        }
        GatewayMode::Production => {
            tracing::info!("Backend URL: {}", config.backend_url);
        }
    }

    // Register Prometheus metrics
    register_metrics();

    // Create shared state
    let state = AppState::new(config);
    let state_data = web::Data::new(state);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = agentpay_gateway::cors::build_cors(&allowed_origins);

        App::new()
            .app_data(state_data.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(routes::health::configure)
            .configure(routes::auth::configure)
            .configure(routes::keys::configure)
            .configure(routes::checkout::configure)
            .configure(routes::webhooks::configure)
            .configure(routes::session::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
