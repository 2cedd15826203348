use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    /// Missing or malformed request field, detected locally
    Validation(String),
    /// Unresolvable session token or missing bearer; hint names the call to make first
    Unauthorized { message: String, hint: String },
    /// Backend returned non-2xx, or the transport failed
    Upstream { status: u16, body: serde_json::Value },
    /// Route exists but not in the current mode
    RouteUnavailable(String),
    /// Internal error
    Internal(String),
}

impl GatewayError {
    /// Upstream failure with no usable response body.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Upstream {
            status,
            body: serde_json::json!({ "error": message.into() }),
        }
    }

    pub fn unauthorized(message: impl Into<String>, hint: impl Into<String>) -> Self {
        GatewayError::Unauthorized {
            message: message.into(),
            hint: hint.into(),
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Validation(msg) => write!(f, "validation error: {}", msg),
            GatewayError::Unauthorized { message, .. } => write!(f, "unauthorized: {}", message),
            GatewayError::Upstream { status, .. } => write!(f, "upstream error: status {}", status),
            GatewayError::RouteUnavailable(msg) => write!(f, "route unavailable: {}", msg),
            GatewayError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        match self {
            GatewayError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            GatewayError::Unauthorized { message, hint } => {
                HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": message,
                    "hint": hint
                }))
            }
            GatewayError::Upstream { status, body } => {
                // Surface the upstream's status and error body unmodified.
                let status = actix_web::http::StatusCode::from_u16(*status)
                    .unwrap_or(actix_web::http::StatusCode::BAD_GATEWAY);
                HttpResponse::build(status).json(body)
            }
            GatewayError::RouteUnavailable(msg) => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "route_unavailable",
                    "message": msg
                }))
            }
            GatewayError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_default_body() {
        let err = GatewayError::upstream(502, "backend unreachable");
        match err {
            GatewayError::Upstream { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body["error"], "backend unreachable");
            }
            _ => panic!("expected Upstream"),
        }
    }

    #[test]
    fn test_error_response_statuses() {
        let resp = GatewayError::Validation("email is required".into()).error_response();
        assert_eq!(resp.status(), 400);

        let resp = GatewayError::unauthorized("no session", "call /auth/login").error_response();
        assert_eq!(resp.status(), 401);

        let resp = GatewayError::RouteUnavailable("sandbox only".into()).error_response();
        assert_eq!(resp.status(), 404);

        let resp = GatewayError::Upstream {
            status: 403,
            body: serde_json::json!({"error": "forbidden"}),
        }
        .error_response();
        assert_eq!(resp.status(), 403);
    }

    #[test]
    fn test_invalid_upstream_status_falls_back_to_bad_gateway() {
        let resp = GatewayError::upstream(1, "weird").error_response();
        assert_eq!(resp.status(), 502);
    }
}
