//! The production proxy: every operation resolves a bearer credential
//! (request header first, stored slot second) and calls the payment backend.
//! Key issuance and checkout creation carry the fallback chain to the legacy
//! routes; rotation and webhook registration are single-shot.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    normalize_checkout, validate_webhook_request, CheckoutRequest, CreateKeyRequest,
    CreateWebhookRequest, ForwardRequest, LoginRequest, ModeHandlers, RotateKeyRequest,
};
use crate::backend::{
    BackendCaller, RouteAttempt, CHECKOUT_ROUTE, KEYS_CREATE_ROUTE, KEYS_ROTATE_ROUTE,
    LEGACY_CHECKOUT_ROUTE, LEGACY_KEYS_CREATE_ROUTE, WEBHOOKS_ROUTE,
};
use crate::config::GatewayMode;
use crate::credentials::CredentialSlot;
use crate::error::GatewayError;
use crate::metrics;
use crate::signature::generate_secret;

pub struct ProductionHandlers {
    pub backend: BackendCaller,
    pub credentials: CredentialSlot,
}

impl ProductionHandlers {
    pub fn new(backend: BackendCaller) -> Self {
        Self {
            backend,
            credentials: CredentialSlot::new(),
        }
    }

    fn sandbox_only(route: &str) -> GatewayError {
        GatewayError::RouteUnavailable(format!(
            "{} is sandbox-only; in production forward an identity via POST /auth/forward",
            route
        ))
    }

    /// Store the key from a successful issuance/rotation response. A body
    /// without a `key` field passes through without touching the slot.
    fn remember_key(&self, body: &Value) {
        if let Some(key) = body["key"].as_str() {
            self.credentials.store_api_key(key.to_string());
        }
    }
}

#[async_trait]
impl ModeHandlers for ProductionHandlers {
    fn mode(&self) -> GatewayMode {
        GatewayMode::Production
    }

    fn session_count(&self) -> Option<usize> {
        None
    }

    async fn login(&self, _body: LoginRequest) -> Result<Value, GatewayError> {
        Err(Self::sandbox_only("POST /auth/login"))
    }

    async fn forward_auth(
        &self,
        bearer: Option<&str>,
        body: ForwardRequest,
    ) -> Result<Value, GatewayError> {
        let jwt = body
            .jwt
            .as_deref()
            .or(bearer)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                GatewayError::Validation(
                    "jwt is required: pass {\"jwt\": ...} or an Authorization bearer".to_string(),
                )
            })?
            .to_string();

        self.credentials.store_forwarded_token(jwt);
        tracing::info!("forwarded identity token stored");

        Ok(json!({
            "ok": true,
            "mode": "production",
            "message": "identity token stored; it will be used for key issuance",
        }))
    }

    async fn issue_key(
        &self,
        bearer: Option<&str>,
        body: CreateKeyRequest,
    ) -> Result<Value, GatewayError> {
        // Bearer-forward is the credential family for issuance.
        let resolved = bearer
            .map(str::to_string)
            .or_else(|| self.credentials.forwarded_token());

        let payload = json!({
            "tag": body.tag,
            "org_id": body.org_id,
            "env": body.env,
            "scopes": body.scopes,
        });

        let attempts = [
            RouteAttempt {
                path: KEYS_CREATE_ROUTE,
                bearer: resolved.as_deref(),
            },
            // Legacy issuance needs no bearer: early-integration callers may
            // not hold a real identity token yet.
            RouteAttempt {
                path: LEGACY_KEYS_CREATE_ROUTE,
                bearer: None,
            },
        ];

        let response = self
            .backend
            .call_chain(&attempts, &payload)
            .await
            .inspect_err(|_| metrics::UPSTREAM_ERRORS.inc())?;

        self.remember_key(&response);
        metrics::KEYS_ISSUED.inc();
        Ok(response)
    }

    async fn rotate_key(
        &self,
        bearer: Option<&str>,
        body: RotateKeyRequest,
    ) -> Result<Value, GatewayError> {
        // Rotation requires an already-valid key; a missing key is a caller
        // error, not a backend limitation, so there is no legacy fallback.
        let key = bearer
            .map(str::to_string)
            .or_else(|| self.credentials.api_key())
            .ok_or_else(|| {
                GatewayError::Validation(
                    "no API key to rotate; call POST /api-keys/create first".to_string(),
                )
            })?;

        let payload = json!({ "tag": body.tag });

        let response = self
            .backend
            .call(KEYS_ROTATE_ROUTE, Some(&key), &payload)
            .await
            .inspect_err(|_| metrics::UPSTREAM_ERRORS.inc())?;

        self.remember_key(&response);
        metrics::KEYS_ROTATED.inc();
        Ok(response)
    }

    async fn create_checkout(
        &self,
        bearer: Option<&str>,
        body: CheckoutRequest,
    ) -> Result<Value, GatewayError> {
        let (amount, currency) = normalize_checkout(&body)?;
        let resolved = bearer
            .map(str::to_string)
            .or_else(|| self.credentials.api_key());

        let payload = json!({
            "amount": amount,
            "currency": currency,
            "metadata": body.metadata,
        });

        let attempts = [
            RouteAttempt {
                path: CHECKOUT_ROUTE,
                bearer: resolved.as_deref(),
            },
            RouteAttempt {
                path: LEGACY_CHECKOUT_ROUTE,
                bearer: None,
            },
        ];

        let response = self
            .backend
            .call_chain(&attempts, &payload)
            .await
            .inspect_err(|_| metrics::UPSTREAM_ERRORS.inc())?;

        metrics::CHECKOUTS_CREATED.inc();
        Ok(response)
    }

    async fn register_webhook(
        &self,
        bearer: Option<&str>,
        body: CreateWebhookRequest,
    ) -> Result<Value, GatewayError> {
        let (url, events) = validate_webhook_request(&body)?;
        let resolved = bearer
            .map(str::to_string)
            .or_else(|| self.credentials.api_key());

        // The secret is client-issued: generated here, registered with the
        // backend, and handed to the caller. It is never derived from or
        // validated against the backend response.
        let secret = generate_secret();

        let payload = json!({
            "url": url,
            "events": events,
            "secret": secret,
        });

        let response = self
            .backend
            .call(WEBHOOKS_ROUTE, resolved.as_deref(), &payload)
            .await
            .inspect_err(|_| metrics::UPSTREAM_ERRORS.inc())?;

        metrics::WEBHOOKS_REGISTERED.inc();

        Ok(json!({
            "id": response["id"],
            "url": url,
            "events": events,
            "status": response["status"].as_str().unwrap_or("enabled"),
            "secret": secret,
        }))
    }

    async fn session_snapshot(&self, _bearer: Option<&str>) -> Result<Value, GatewayError> {
        Err(Self::sandbox_only("GET /session"))
    }

    async fn list_sessions(&self) -> Result<Value, GatewayError> {
        Err(Self::sandbox_only("GET /sessions"))
    }
}
