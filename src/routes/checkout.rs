use actix_web::{web, HttpRequest, HttpResponse};

use super::bearer_token;
use crate::error::GatewayError;
use crate::handlers::CheckoutRequest;
use crate::state::AppState;

/// POST /checkout/demo - Create a checkout
pub async fn create(
    req: HttpRequest,
    body: Option<web::Json<CheckoutRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let bearer = bearer_token(&req);
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let response = state
        .handlers
        .create_checkout(bearer.as_deref(), body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkout/demo", web::post().to(create));
}
