//! The production-mode credential slot.
//!
//! A single mutable record, not keyed: "the last credential seen or issued".
//! The forwarded identity token is consulted only for key issuance; the API
//! key for every subsequent call family. Each successful forward or rotation
//! overwrites the slot; an overwrite that completed before the caller
//! disconnected is not rolled back.

use std::sync::RwLock;

#[derive(Debug, Default, Clone)]
struct Inner {
    forwarded_token: Option<String>,
    api_key: Option<String>,
}

#[derive(Default)]
pub struct CredentialSlot {
    inner: RwLock<Inner>,
}

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarded_token(&self) -> Option<String> {
        self.inner.read().expect("credential lock").forwarded_token.clone()
    }

    pub fn api_key(&self) -> Option<String> {
        self.inner.read().expect("credential lock").api_key.clone()
    }

    pub fn store_forwarded_token(&self, token: String) {
        self.inner.write().expect("credential lock").forwarded_token = Some(token);
    }

    pub fn store_api_key(&self, key: String) {
        self.inner.write().expect("credential lock").api_key = Some(key);
    }
}

impl std::fmt::Debug for CredentialSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().expect("credential lock");
        f.debug_struct("CredentialSlot")
            .field(
                "forwarded_token",
                &inner.forwarded_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_key", &inner.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
