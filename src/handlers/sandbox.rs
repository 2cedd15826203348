//! The self-contained simulator: every operation is answered from process
//! memory, no backend involved. Any credentials are accepted by design; this
//! mode exists so an agent can exercise the full key/checkout/webhook flow
//! before real identity wiring exists.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use super::{
    normalize_checkout, validate_webhook_request, CheckoutRequest, CreateKeyRequest,
    CreateWebhookRequest, ForwardRequest, LoginRequest, ModeHandlers, RotateKeyRequest,
};
use crate::config::GatewayMode;
use crate::error::GatewayError;
use crate::metrics;
use crate::session::{
    generate_api_key, generate_checkout_id, generate_webhook_id, preview, CheckoutRecord,
    SessionRegistry, WebhookRecord,
};
use crate::signature::generate_secret;

const LOGIN_WARNING: &str = "sandbox session: credentials are not verified";

#[derive(Default)]
pub struct SandboxHandlers {
    pub sessions: SessionRegistry,
}

impl SandboxHandlers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModeHandlers for SandboxHandlers {
    fn mode(&self) -> GatewayMode {
        GatewayMode::Sandbox
    }

    fn session_count(&self) -> Option<usize> {
        Some(self.sessions.len())
    }

    async fn login(&self, body: LoginRequest) -> Result<Value, GatewayError> {
        let email = body
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| GatewayError::Validation("email is required".to_string()))?
            .to_string();

        // The password is accepted but never checked; this is the simulator.
        let token = self.sessions.create(email.clone());
        metrics::SESSIONS_CREATED.inc();
        tracing::info!(email = %email, "sandbox session created");

        Ok(json!({
            "ok": true,
            "token": token,
            "email": email,
            "warning": LOGIN_WARNING,
        }))
    }

    async fn forward_auth(
        &self,
        _bearer: Option<&str>,
        _body: ForwardRequest,
    ) -> Result<Value, GatewayError> {
        // Compatibility response: the legacy forwarding flow has no meaning
        // without a backend, but callers probing it should not see an error.
        Ok(json!({
            "ok": true,
            "mode": "sandbox",
            "message": "sandbox mode needs no forwarded identity; call POST /auth/login instead",
        }))
    }

    async fn issue_key(
        &self,
        bearer: Option<&str>,
        body: CreateKeyRequest,
    ) -> Result<Value, GatewayError> {
        let key = self.sessions.require_mut(bearer, |session| {
            let key = generate_api_key();
            session.api_key = Some(key.clone());
            key
        })?;
        metrics::KEYS_ISSUED.inc();

        Ok(json!({
            "ok": true,
            "key": key,
            "mode": "sandbox",
            "tag": body.tag,
            "env": body.env.unwrap_or_else(|| "sandbox".to_string()),
        }))
    }

    async fn rotate_key(
        &self,
        bearer: Option<&str>,
        _body: RotateKeyRequest,
    ) -> Result<Value, GatewayError> {
        let (key, old_preview) = self.sessions.require_mut(bearer, |session| {
            let old = session.api_key.take();
            let key = generate_api_key();
            session.api_key = Some(key.clone());
            // Only a truncated preview of the superseded key is ever echoed.
            (key, old.map(|k| preview(&k)))
        })?;
        metrics::KEYS_ROTATED.inc();

        Ok(json!({
            "key": key,
            "rotated": true,
            "old_key": old_preview,
        }))
    }

    async fn create_checkout(
        &self,
        bearer: Option<&str>,
        body: CheckoutRequest,
    ) -> Result<Value, GatewayError> {
        let (amount, currency) = normalize_checkout(&body)?;

        let record = self.sessions.require_mut(bearer, |session| {
            let record = CheckoutRecord {
                id: generate_checkout_id(),
                amount,
                currency,
                status: "pending".to_string(),
                created_at: Utc::now(),
            };
            session.checkouts.push(record.clone());
            record
        })?;
        metrics::CHECKOUTS_CREATED.inc();

        Ok(json!({
            "id": record.id,
            "object": "checkout",
            "amount": record.amount,
            "currency": record.currency,
            "status": record.status,
            "payment_url": format!("https://pay.sandbox.invalid/c/{}", record.id),
            "created_at": record.created_at,
            "metadata": body.metadata,
        }))
    }

    async fn register_webhook(
        &self,
        bearer: Option<&str>,
        body: CreateWebhookRequest,
    ) -> Result<Value, GatewayError> {
        let (url, events) = validate_webhook_request(&body)?;
        let secret = generate_secret();

        let record = self.sessions.require_mut(bearer, |session| {
            let record = WebhookRecord {
                id: generate_webhook_id(),
                url,
                events,
                created_at: Utc::now(),
            };
            session.webhooks.push(record.clone());
            record
        })?;
        metrics::WEBHOOKS_REGISTERED.inc();

        Ok(json!({
            "id": record.id,
            "url": record.url,
            "events": record.events,
            "status": "enabled",
            "secret": secret,
        }))
    }

    async fn session_snapshot(&self, bearer: Option<&str>) -> Result<Value, GatewayError> {
        let session = self.sessions.require_snapshot(bearer)?;

        Ok(json!({
            "email": session.email,
            "created_at": session.created_at,
            "api_key": session.api_key.as_deref().map(preview),
            "checkouts": session.checkouts,
            "webhooks": session.webhooks,
        }))
    }

    async fn list_sessions(&self) -> Result<Value, GatewayError> {
        // Summary only: tokens and keys are never exposed here.
        let sessions: Vec<Value> = self
            .sessions
            .all()
            .into_iter()
            .map(|s| {
                json!({
                    "email": s.email,
                    "created_at": s.created_at,
                    "checkouts": s.checkouts.len(),
                    "webhooks": s.webhooks.len(),
                    "has_api_key": s.api_key.is_some(),
                })
            })
            .collect();

        Ok(json!({
            "count": sessions.len(),
            "sessions": sessions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_request(email: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some("ignored".to_string()),
        }
    }

    async fn logged_in() -> (SandboxHandlers, String) {
        let handlers = SandboxHandlers::new();
        let resp = handlers.login(login_request("demo@x.io")).await.unwrap();
        let token = resp["token"].as_str().unwrap().to_string();
        (handlers, token)
    }

    #[actix_rt::test]
    async fn test_login_rejects_empty_email() {
        let handlers = SandboxHandlers::new();
        let err = handlers.login(LoginRequest::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));

        let err = handlers.login(login_request("   ")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[actix_rt::test]
    async fn test_issue_key_requires_session() {
        let handlers = SandboxHandlers::new();
        let err = handlers
            .issue_key(None, CreateKeyRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized { .. }));

        let err = handlers
            .issue_key(Some("st_bogus"), CreateKeyRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized { .. }));
    }

    #[actix_rt::test]
    async fn test_issue_key_shape_and_storage() {
        let (handlers, token) = logged_in().await;
        let resp = handlers
            .issue_key(Some(&token), CreateKeyRequest::default())
            .await
            .unwrap();

        let key = resp["key"].as_str().unwrap();
        assert!(key.starts_with("pk_demo_"));
        assert_eq!(key.len(), "pk_demo_".len() + 32);

        let session = handlers.sessions.snapshot(&token).unwrap();
        assert_eq!(session.api_key.as_deref(), Some(key));
    }

    #[actix_rt::test]
    async fn test_rotate_returns_prefix_of_old_key() {
        let (handlers, token) = logged_in().await;
        let first = handlers
            .issue_key(Some(&token), CreateKeyRequest::default())
            .await
            .unwrap();
        let first_key = first["key"].as_str().unwrap().to_string();

        let rotated = handlers
            .rotate_key(Some(&token), RotateKeyRequest::default())
            .await
            .unwrap();

        let new_key = rotated["key"].as_str().unwrap();
        assert_ne!(new_key, first_key);
        let old_preview = rotated["old_key"].as_str().unwrap();
        assert!(first_key.starts_with(old_preview));
        assert!(old_preview.len() < first_key.len());

        let session = handlers.sessions.snapshot(&token).unwrap();
        assert_eq!(session.api_key.as_deref(), Some(new_key));
    }

    #[actix_rt::test]
    async fn test_rotate_without_prior_key() {
        let (handlers, token) = logged_in().await;
        let resp = handlers
            .rotate_key(Some(&token), RotateKeyRequest::default())
            .await
            .unwrap();
        assert!(resp["old_key"].is_null());
        assert!(resp["key"].as_str().unwrap().starts_with("pk_demo_"));
    }

    #[actix_rt::test]
    async fn test_checkout_appends_to_session() {
        let (handlers, token) = logged_in().await;
        let resp = handlers
            .create_checkout(
                Some(&token),
                CheckoutRequest {
                    amount: Some(4900),
                    currency: Some("usd".to_string()),
                    metadata: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(resp["amount"], 4900);
        assert_eq!(resp["currency"], "usd");
        assert_eq!(resp["status"], "pending");
        assert!(resp["id"].as_str().unwrap().starts_with("cs_demo_"));
        assert!(resp["payment_url"].as_str().unwrap().contains(resp["id"].as_str().unwrap()));

        let session = handlers.sessions.snapshot(&token).unwrap();
        assert_eq!(session.checkouts.len(), 1);
        assert_eq!(session.checkouts[0].amount, 4900);
    }

    #[actix_rt::test]
    async fn test_webhook_registration_records_and_returns_secret() {
        let (handlers, token) = logged_in().await;
        let resp = handlers
            .register_webhook(
                Some(&token),
                CreateWebhookRequest {
                    url: Some("https://hooks.example.com/pay".to_string()),
                    events: Some(vec!["checkout.completed".to_string()]),
                },
            )
            .await
            .unwrap();

        assert!(resp["id"].as_str().unwrap().starts_with("wh_demo_"));
        assert_eq!(resp["status"], "enabled");
        assert!(resp["secret"].as_str().unwrap().starts_with("whsec_"));

        let session = handlers.sessions.snapshot(&token).unwrap();
        assert_eq!(session.webhooks.len(), 1);
        assert_eq!(session.webhooks[0].url, "https://hooks.example.com/pay");
    }

    #[actix_rt::test]
    async fn test_snapshot_truncates_api_key() {
        let (handlers, token) = logged_in().await;
        let issued = handlers
            .issue_key(Some(&token), CreateKeyRequest::default())
            .await
            .unwrap();
        let full_key = issued["key"].as_str().unwrap();

        let snapshot = handlers.session_snapshot(Some(&token)).await.unwrap();
        let shown = snapshot["api_key"].as_str().unwrap();
        assert!(full_key.starts_with(shown));
        assert!(shown.len() < full_key.len());
    }

    #[actix_rt::test]
    async fn test_list_sessions_hides_tokens() {
        let (handlers, token) = logged_in().await;
        let listing = handlers.list_sessions().await.unwrap();
        assert_eq!(listing["count"], 1);
        assert!(!listing.to_string().contains(&token));
    }
}
