//! Outbound calls to the payment backend, and the fallback protocol.
//!
//! Fallback is modeled as an ordered list of candidate routes with a uniform
//! attempt-classify-continue policy, not ad hoc exception handling: key
//! issuance and checkout creation try the primary v1 route first and, on any
//! failure, retry once against the legacy route with no bearer attached.
//! Rotation and webhook registration are single-shot.

use serde_json::Value;

use crate::error::GatewayError;

// Primary (v1) backend routes
pub const KEYS_CREATE_ROUTE: &str = "/v1/api-keys";
pub const KEYS_ROTATE_ROUTE: &str = "/v1/api-keys/rotate";
pub const CHECKOUT_ROUTE: &str = "/v1/checkout/sessions";
pub const WEBHOOKS_ROUTE: &str = "/v1/webhooks";

// Legacy routes, looser auth, attempted only after the primary fails
pub const LEGACY_KEYS_CREATE_ROUTE: &str = "/legacy/api-keys";
pub const LEGACY_CHECKOUT_ROUTE: &str = "/legacy/checkout/sessions";

/// One candidate route in a fallback chain.
pub struct RouteAttempt<'a> {
    pub path: &'a str,
    pub bearer: Option<&'a str>,
}

pub struct BackendCaller {
    client: reqwest::Client,
    base_url: String,
}

impl BackendCaller {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `path`, attaching `Authorization: Bearer` when present.
    ///
    /// Non-2xx responses become `GatewayError::Upstream` carrying the
    /// upstream's status and its JSON error body when parseable, else a
    /// synthetic `{"error": ...}`. Transport failures get a bad-gateway
    /// status.
    pub async fn call(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, "backend call failed");
            GatewayError::upstream(502, "backend unreachable")
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|_| GatewayError::upstream(502, "failed to read backend response"))?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::json!({ "error": format!("backend returned status {}", status.as_u16()) })
            });
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|_| GatewayError::upstream(502, "backend returned non-JSON body"))
    }

    /// Attempt each candidate route in order; the first success wins. Any
    /// failure continues to the next candidate; the last candidate's error is
    /// surfaced to the caller unmodified.
    pub async fn call_chain(
        &self,
        attempts: &[RouteAttempt<'_>],
        body: &Value,
    ) -> Result<Value, GatewayError> {
        let mut last_error = GatewayError::upstream(502, "no backend route attempted");

        for (i, attempt) in attempts.iter().enumerate() {
            match self.call(attempt.path, attempt.bearer, body).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if i + 1 < attempts.len() {
                        tracing::info!(
                            path = %attempt.path,
                            error = %e,
                            "backend route failed, falling back"
                        );
                        crate::metrics::FALLBACK_ATTEMPTS.inc();
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
