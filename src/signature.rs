//! Webhook secret generation and signature verification.
//!
//! Secrets are client-issued: the gateway generates them at registration time
//! and hands them to the caller, who is the owner of record. The gateway never
//! stores a secret beyond the registration response.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Webhook secret prefix, signals the secret's origin on sight.
const SECRET_PREFIX: &str = "whsec_";

/// Generate a fresh webhook secret: 32 bytes of CSPRNG randomness as hex.
pub fn generate_secret() -> String {
    format!("{}{}", SECRET_PREFIX, random_hex(32))
}

/// `n_bytes` of cryptographically secure randomness, hex-encoded.
pub fn random_hex(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compute HMAC-SHA256 over the raw payload bytes under the secret.
/// Returns the hex-encoded MAC.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a claimed hex signature against the payload and secret.
///
/// Malformed hex is a verification failure, never an error. Signatures of a
/// different length are rejected before the comparison; the equal-length
/// comparison itself is constant time and does not short-circuit.
pub fn verify_signature(payload: &[u8], claimed_hex: &str, secret: &str) -> bool {
    let claimed = match hex::decode(claimed_hex) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    if claimed.len() != expected.len() {
        return false;
    }

    expected.as_slice().ct_eq(claimed.as_slice()).into()
}
