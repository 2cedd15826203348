//! In-memory session registry (sandbox mode only).
//!
//! A session is addressed solely by its unguessable token; there is no
//! secondary index. Records live for the process lifetime and are never
//! explicitly destroyed.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::error::GatewayError;
use crate::signature::random_hex;

/// Append-only checkout record, owned by its parent session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRecord {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only webhook registration record, owned by its parent session.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookRecord {
    pub id: String,
    pub url: String,
    pub events: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub api_key: Option<String>,
    pub checkouts: Vec<CheckoutRecord>,
    pub webhooks: Vec<WebhookRecord>,
    pub created_at: DateTime<Utc>,
}

/// Generate an unguessable session token.
pub fn generate_token() -> String {
    format!("st_{}", random_hex(24))
}

/// Generate a sandbox API key: `pk_demo_<32 hex chars>`.
pub fn generate_api_key() -> String {
    format!("pk_demo_{}", random_hex(16))
}

/// Generate a sandbox checkout id.
pub fn generate_checkout_id() -> String {
    format!("cs_demo_{}", random_hex(12))
}

/// Generate a sandbox webhook id.
pub fn generate_webhook_id() -> String {
    format!("wh_demo_{}", random_hex(12))
}

/// Truncated preview of a secret for audit display. A strict prefix of the
/// full value; the full secret is never echoed back.
pub fn preview(secret: &str) -> String {
    secret.chars().take(12).collect()
}

/// Token-keyed table of sandbox sessions.
///
/// Each entry is guarded by the map's per-shard lock: `with_session_mut`
/// holds exclusive access to one record for the duration of the closure, so
/// two requests racing to mutate the same session cannot lose updates. The
/// closures never await, so no lock is held across I/O.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh empty session for the given identity and return its
    /// token. Any non-empty identity is accepted.
    pub fn create(&self, email: String) -> String {
        let token = generate_token();
        let session = Session {
            token: token.clone(),
            email,
            api_key: None,
            checkouts: Vec::new(),
            webhooks: Vec::new(),
            created_at: Utc::now(),
        };
        self.sessions.insert(token.clone(), session);
        token
    }

    /// Pure lookup; returns an owned snapshot, never a live reference.
    pub fn snapshot(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Run `f` with exclusive access to the session, or None if the token
    /// does not resolve.
    pub fn with_session_mut<T>(
        &self,
        token: &str,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Option<T> {
        self.sessions
            .get_mut(token)
            .map(|mut entry| f(entry.value_mut()))
    }

    /// Resolve the caller's bearer token to a mutable session, or emit the
    /// "call login first" authorization error. The gate every sandbox
    /// mutating handler passes through.
    pub fn require_mut<T>(
        &self,
        bearer: Option<&str>,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, GatewayError> {
        let token = bearer.ok_or_else(unauthorized)?;
        self.with_session_mut(token, f).ok_or_else(unauthorized)
    }

    /// Resolve the caller's bearer token to a session snapshot, or emit the
    /// authorization error.
    pub fn require_snapshot(&self, bearer: Option<&str>) -> Result<Session, GatewayError> {
        let token = bearer.ok_or_else(unauthorized)?;
        self.snapshot(token).ok_or_else(unauthorized)
    }

    /// Owned snapshots of every session, for the summary listing.
    pub fn all(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn unauthorized() -> GatewayError {
    GatewayError::unauthorized(
        "no session for this bearer token",
        "call POST /auth/login first and pass the returned token as a bearer",
    )
}
