use actix_web::{web, HttpResponse};

use crate::metrics::REGISTRY;
use crate::state::AppState;

/// GET /health - Health check endpoint
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let mut response = serde_json::json!({
        "status": "ok",
        "service": "agentpay-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.handlers.mode().as_str(),
    });

    if let Some(count) = state.handlers.session_count() {
        response["sessions"] = serde_json::json!(count);
    }

    HttpResponse::Ok().json(response)
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn metrics() -> HttpResponse {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().body("Failed to encode metrics");
    }

    let output = String::from_utf8(buffer).unwrap_or_default();
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(output)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics));
}
