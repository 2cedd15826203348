use actix_web::{web, HttpRequest, HttpResponse};

use super::bearer_token;
use crate::error::GatewayError;
use crate::handlers::{CreateKeyRequest, RotateKeyRequest};
use crate::state::AppState;

/// POST /api-keys/create - Issue an API key
pub async fn create(
    req: HttpRequest,
    body: Option<web::Json<CreateKeyRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let bearer = bearer_token(&req);
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state.handlers.issue_key(bearer.as_deref(), body).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api-keys/rotate - Rotate the current API key
pub async fn rotate(
    req: HttpRequest,
    body: Option<web::Json<RotateKeyRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let bearer = bearer_token(&req);
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state.handlers.rotate_key(bearer.as_deref(), body).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api-keys/create", web::post().to(create))
        .route("/api-keys/rotate", web::post().to(rotate));
}
