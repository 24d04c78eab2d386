//! HMAC-SHA256 signatures for OAuth callbacks and webhook payloads.
//!
//! Two encodings are in play: OAuth callbacks carry a lowercase hex digest in
//! the `hmac` query parameter, while webhooks carry a base64 digest in the
//! `X-Shopify-Hmac-SHA256` header. Both are verified here with constant-time
//! comparison so a malformed or truncated signature simply fails to match
//! rather than causing an error path with observable timing.

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::oauth::CallbackQuery;

type HmacSha256 = Hmac<Sha256>;

/// Computes an HMAC-SHA256 signature as a lowercase hex string.
///
/// This is the encoding Shopify uses for the `hmac` query parameter on OAuth
/// callbacks.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Computes an HMAC-SHA256 signature over raw bytes as standard base64.
///
/// This is the encoding Shopify uses for the `X-Shopify-Hmac-SHA256` webhook
/// header. The input is raw bytes so the exact delivered payload is signed,
/// with no UTF-8 interpretation in between.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature_base64(message: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Compares two strings in constant time.
///
/// Used for every signature and nonce comparison in the crate. Different
/// lengths are handled by `ConstantTimeEq` without early return.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Verifies the hex signature on an OAuth callback query.
///
/// The signable string is the sorted, re-encoded query with the `hmac`
/// parameter removed; see [`CallbackQuery::to_signable_string`].
#[must_use]
pub fn verify_query_signature(query: &CallbackQuery, secret: &str) -> bool {
    let computed = compute_signature(&query.to_signable_string(), secret);
    constant_time_compare(&computed, &query.hmac)
}

/// Verifies the base64 signature header on a raw webhook body.
///
/// `provided` is the value of the `X-Shopify-Hmac-SHA256` header as received.
/// A missing, empty, or non-base64 value fails the comparison like any other
/// wrong signature.
#[must_use]
pub fn verify_body_signature(body: &[u8], provided: &str, secret: &str) -> bool {
    let computed = compute_signature_base64(body, secret);
    constant_time_compare(&computed, provided)
}

// Internal hex encoding since nothing else in the crate needs a hex dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}
