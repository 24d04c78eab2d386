//! Server-side nonce storage for OAuth CSRF protection.
//!
//! A nonce is issued when an authorization flow begins and consumed exactly
//! once when the callback arrives. The store is the sole authority on which
//! nonces are live; nothing about the nonce travels in cookies.

use std::time::Duration;

use moka::sync::Cache;
use rand::RngCore;

use crate::auth::oauth::signature::constant_time_compare;
use crate::config::ShopDomain;

/// How long an issued nonce remains valid.
///
/// Bounds the window between starting an authorization and completing the
/// callback; a merchant who walks away from the consent screen for longer
/// than this simply restarts the flow.
pub const NONCE_TTL: Duration = Duration::from_secs(600);

/// Nonces the store will hold before evicting. One per shop with an OAuth
/// flow in flight, so this is generous.
const NONCE_CAPACITY: u64 = 10_000;

/// Issues and consumes per-shop CSRF nonces.
///
/// Implementations must uphold single-use semantics: `consume` removes the
/// stored nonce unconditionally before comparing, so a replayed callback
/// finds nothing even if the first attempt failed later in the pipeline.
pub trait NonceStore: Send + Sync {
    /// Issues a fresh nonce for a shop, replacing any previously issued one.
    ///
    /// Last-initiate-wins: only the most recent authorization attempt for a
    /// shop can complete.
    fn issue(&self, shop: &ShopDomain) -> String;

    /// Consumes the nonce for a shop and compares it against `provided`.
    ///
    /// Returns `true` only if a nonce was stored and matches. The stored
    /// value is removed whether or not the comparison succeeds.
    fn consume(&self, shop: &ShopDomain, provided: &str) -> bool;
}

/// In-process nonce store with automatic expiry.
///
/// Process-local by design. An interrupted flow (restart between begin and
/// callback) fails the state check and the merchant restarts authorization.
pub struct MemoryNonceStore {
    nonces: Cache<String, String>,
}

impl MemoryNonceStore {
    /// Creates a store with the default [`NONCE_TTL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(NONCE_TTL)
    }

    /// Creates a store with a custom time-to-live.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            nonces: Cache::builder()
                .max_capacity(NONCE_CAPACITY)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl Default for MemoryNonceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceStore for MemoryNonceStore {
    fn issue(&self, shop: &ShopDomain) -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        let nonce = hex_encode(&bytes);

        self.nonces
            .insert(shop.as_ref().to_string(), nonce.clone());
        nonce
    }

    fn consume(&self, shop: &ShopDomain, provided: &str) -> bool {
        // Remove first so even a failed comparison burns the nonce.
        match self.nonces.remove(shop.as_ref()) {
            Some(stored) => constant_time_compare(&stored, provided),
            None => false,
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut result = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        result.push(HEX_CHARS[(byte >> 4) as usize] as char);
        result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    result
}

// Verify MemoryNonceStore is usable behind Arc<dyn NonceStore>
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MemoryNonceStore>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> ShopDomain {
        ShopDomain::new("test.myshopify.com").unwrap()
    }

    #[test]
    fn test_issue_produces_128_bit_hex_nonce() {
        let store = MemoryNonceStore::new();
        let nonce = store.issue(&shop());
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_issue_produces_unique_nonces() {
        let store = MemoryNonceStore::new();
        assert_ne!(store.issue(&shop()), store.issue(&shop()));
    }

    #[test]
    fn test_consume_accepts_matching_nonce_once() {
        let store = MemoryNonceStore::new();
        let nonce = store.issue(&shop());

        assert!(store.consume(&shop(), &nonce));
        // Replay of the same nonce is refused.
        assert!(!store.consume(&shop(), &nonce));
    }

    #[test]
    fn test_consume_burns_nonce_on_mismatch() {
        let store = MemoryNonceStore::new();
        let nonce = store.issue(&shop());

        assert!(!store.consume(&shop(), "wrong-nonce"));
        // The stored nonce was removed by the failed attempt.
        assert!(!store.consume(&shop(), &nonce));
    }

    #[test]
    fn test_reissue_invalidates_previous_nonce() {
        let store = MemoryNonceStore::new();
        let first = store.issue(&shop());
        let second = store.issue(&shop());

        assert!(!store.consume(&shop(), &first));
        // Burned by the attempt above.
        assert!(!store.consume(&shop(), &second));

        let third = store.issue(&shop());
        assert!(store.consume(&shop(), &third));
    }

    #[test]
    fn test_consume_without_issue_fails() {
        let store = MemoryNonceStore::new();
        assert!(!store.consume(&shop(), "anything"));
    }

    #[test]
    fn test_expired_nonce_is_rejected() {
        let store = MemoryNonceStore::with_ttl(Duration::from_millis(10));
        let nonce = store.issue(&shop());

        std::thread::sleep(Duration::from_millis(50));
        assert!(!store.consume(&shop(), &nonce));
    }

    #[test]
    fn test_nonces_are_scoped_per_shop() {
        let store = MemoryNonceStore::new();
        let other = ShopDomain::new("other.myshopify.com").unwrap();

        let nonce_a = store.issue(&shop());
        let nonce_b = store.issue(&other);

        assert!(!store.consume(&shop(), &nonce_b));
        assert!(store.consume(&other, &nonce_b));
        // shop()'s nonce was burned by the mismatched attempt.
        assert!(!store.consume(&shop(), &nonce_a));
    }
}
