use actix_web::{web, HttpRequest, HttpResponse};

use super::bearer_token;
use crate::error::GatewayError;
use crate::state::AppState;

/// GET /session - Full snapshot of the caller's session (sandbox only)
pub async fn snapshot(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let bearer = bearer_token(&req);
    let response = state.handlers.session_snapshot(bearer.as_deref()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /sessions - Summary of all live sessions, no tokens (sandbox only)
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, GatewayError> {
    let response = state.handlers.list_sessions().await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/session", web::get().to(snapshot))
        .route("/sessions", web::get().to(list));
}
