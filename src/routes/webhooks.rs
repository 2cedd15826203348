use actix_web::{web, HttpRequest, HttpResponse};

use super::bearer_token;
use crate::error::GatewayError;
use crate::handlers::CreateWebhookRequest;
use crate::state::AppState;

/// POST /webhooks/create - Register a webhook destination
pub async fn create(
    req: HttpRequest,
    body: Option<web::Json<CreateWebhookRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let bearer = bearer_token(&req);
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state
        .handlers
        .register_webhook(bearer.as_deref(), body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhooks/create", web::post().to(create));
}
