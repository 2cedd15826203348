//! Mode-dispatched request handlers.
//!
//! The process-wide mode is resolved once at startup and selects one of two
//! implementations of [`ModeHandlers`]; routes never re-check the mode flag.
//! Sandbox handlers mutate in-memory state and fabricate responses;
//! production handlers resolve a bearer credential and proxy to the backend,
//! applying the fallback protocol where it applies.

mod production;
mod sandbox;

pub use production::ProductionHandlers;
pub use sandbox::SandboxHandlers;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::backend::BackendCaller;
use crate::config::{GatewayConfig, GatewayMode};
use crate::error::GatewayError;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForwardRequest {
    pub jwt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateKeyRequest {
    pub tag: Option<String>,
    pub org_id: Option<String>,
    pub env: Option<String>,
    pub scopes: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RotateKeyRequest {
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateWebhookRequest {
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
}

/// One handler per inbound operation. `bearer` is the raw token from the
/// `Authorization` header, already stripped of the `Bearer ` prefix.
#[async_trait]
pub trait ModeHandlers: Send + Sync {
    fn mode(&self) -> GatewayMode;

    /// Number of live sessions, sandbox only.
    fn session_count(&self) -> Option<usize>;

    async fn login(&self, body: LoginRequest) -> Result<Value, GatewayError>;

    async fn forward_auth(
        &self,
        bearer: Option<&str>,
        body: ForwardRequest,
    ) -> Result<Value, GatewayError>;

    async fn issue_key(
        &self,
        bearer: Option<&str>,
        body: CreateKeyRequest,
    ) -> Result<Value, GatewayError>;

    async fn rotate_key(
        &self,
        bearer: Option<&str>,
        body: RotateKeyRequest,
    ) -> Result<Value, GatewayError>;

    async fn create_checkout(
        &self,
        bearer: Option<&str>,
        body: CheckoutRequest,
    ) -> Result<Value, GatewayError>;

    async fn register_webhook(
        &self,
        bearer: Option<&str>,
        body: CreateWebhookRequest,
    ) -> Result<Value, GatewayError>;

    async fn session_snapshot(&self, bearer: Option<&str>) -> Result<Value, GatewayError>;

    async fn list_sessions(&self) -> Result<Value, GatewayError>;
}

/// Select the handler set for the resolved mode. Called once at startup.
pub fn select_handlers(
    config: &GatewayConfig,
    client: reqwest::Client,
) -> Arc<dyn ModeHandlers> {
    match config.mode {
        GatewayMode::Sandbox => Arc::new(SandboxHandlers::new()),
        GatewayMode::Production => Arc::new(ProductionHandlers::new(BackendCaller::new(
            client,
            config.backend_url.clone(),
        ))),
    }
}

const DEFAULT_CHECKOUT_AMOUNT: i64 = 2500;
const DEFAULT_CHECKOUT_CURRENCY: &str = "usd";

/// Apply defaults and validate a checkout request. Amount is in minor
/// currency units; currency is a lowercase 3-letter code.
pub(crate) fn normalize_checkout(body: &CheckoutRequest) -> Result<(i64, String), GatewayError> {
    let amount = body.amount.unwrap_or(DEFAULT_CHECKOUT_AMOUNT);
    if amount <= 0 {
        return Err(GatewayError::Validation(
            "amount must be a positive integer of minor currency units".to_string(),
        ));
    }

    let currency = body
        .currency
        .as_deref()
        .unwrap_or(DEFAULT_CHECKOUT_CURRENCY)
        .to_lowercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(GatewayError::Validation(
            "currency must be a 3-letter code".to_string(),
        ));
    }

    Ok((amount, currency))
}

/// Validate a webhook registration request: a parseable http(s) destination
/// and a non-empty event set.
pub(crate) fn validate_webhook_request(
    body: &CreateWebhookRequest,
) -> Result<(String, Vec<String>), GatewayError> {
    let url = body
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| GatewayError::Validation("url is required".to_string()))?;

    let parsed = Url::parse(url)
        .map_err(|_| GatewayError::Validation("url must be a valid URL".to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(GatewayError::Validation(
            "url must use http or https".to_string(),
        ));
    }

    let events = body
        .events
        .clone()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            GatewayError::Validation("events must be a non-empty list".to_string())
        })?;
    if events.iter().any(|e| e.trim().is_empty()) {
        return Err(GatewayError::Validation(
            "events must not contain empty names".to_string(),
        ));
    }

    Ok((url.to_string(), events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_checkout_defaults() {
        let (amount, currency) = normalize_checkout(&CheckoutRequest::default()).unwrap();
        assert_eq!(amount, DEFAULT_CHECKOUT_AMOUNT);
        assert_eq!(currency, "usd");
    }

    #[test]
    fn test_normalize_checkout_rejects_bad_input() {
        let bad_amount = CheckoutRequest {
            amount: Some(0),
            ..Default::default()
        };
        assert!(normalize_checkout(&bad_amount).is_err());

        let bad_currency = CheckoutRequest {
            currency: Some("dollars".to_string()),
            ..Default::default()
        };
        assert!(normalize_checkout(&bad_currency).is_err());
    }

    #[test]
    fn test_normalize_checkout_lowercases_currency() {
        let req = CheckoutRequest {
            amount: Some(4900),
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        let (amount, currency) = normalize_checkout(&req).unwrap();
        assert_eq!(amount, 4900);
        assert_eq!(currency, "usd");
    }

    #[test]
    fn test_validate_webhook_request() {
        let ok = CreateWebhookRequest {
            url: Some("https://hooks.example.com/pay".to_string()),
            events: Some(vec!["checkout.completed".to_string()]),
        };
        assert!(validate_webhook_request(&ok).is_ok());

        let no_url = CreateWebhookRequest {
            url: None,
            events: Some(vec!["checkout.completed".to_string()]),
        };
        assert!(validate_webhook_request(&no_url).is_err());

        let empty_events = CreateWebhookRequest {
            url: Some("https://hooks.example.com/pay".to_string()),
            events: Some(vec![]),
        };
        assert!(validate_webhook_request(&empty_events).is_err());

        let bad_scheme = CreateWebhookRequest {
            url: Some("ftp://hooks.example.com".to_string()),
            events: Some(vec!["checkout.completed".to_string()]),
        };
        assert!(validate_webhook_request(&bad_scheme).is_err());
    }
}
