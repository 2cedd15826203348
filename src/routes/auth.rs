use actix_web::{web, HttpRequest, HttpResponse};

use super::bearer_token;
use crate::error::GatewayError;
use crate::handlers::{ForwardRequest, LoginRequest};
use crate::state::AppState;

/// POST /auth/login - Create a sandbox session (sandbox only)
pub async fn login(
    body: Option<web::Json<LoginRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state.handlers.login(body).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/forward - Forward a backend identity token
pub async fn forward(
    req: HttpRequest,
    body: Option<web::Json<ForwardRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let bearer = bearer_token(&req);
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state.handlers.forward_auth(bearer.as_deref(), body).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(login))
        .route("/auth/forward", web::post().to(forward));
}
