//! Access credentials issued by a completed OAuth exchange.
//!
//! A [`Session`] is the {shop, token} pair obtained from the token endpoint.
//! It is written once per successful callback and read-only afterwards; the
//! in-process [`SessionStore`] exists so compliance webhooks have local state
//! to delete.

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde::Deserialize;
use std::fmt;

use crate::config::ShopDomain;

/// Sessions the store will hold before evicting; far above any realistic
/// single-process tenant count.
const SESSION_CAPACITY: u64 = 10_000;

/// An access credential for a single shop.
///
/// The token is exclusively owned by the shop it was issued for and is never
/// logged in full; the `Debug` implementation masks it.
#[derive(Clone)]
pub struct Session {
    /// The shop this credential belongs to.
    pub shop: ShopDomain,
    /// The opaque access token.
    pub access_token: String,
    /// The scopes actually granted by the provider.
    pub scope: String,
    /// When the exchange completed.
    pub obtained_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session stamped with the current time.
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            shop,
            access_token: access_token.into(),
            scope: scope.into(),
            obtained_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("shop", &self.shop)
            .field("access_token", &"*****")
            .field("scope", &self.scope)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Response body returned by the provider's token endpoint.
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    /// The granted access token.
    pub access_token: String,
    /// The scopes actually granted.
    #[serde(default)]
    pub scope: String,
}

/// In-process session storage keyed by shop domain.
///
/// Written once per successful OAuth callback; removed by the compliance
/// webhook handlers. Process-local by design — a restart drops all sessions
/// and merchants re-authenticate through OAuth.
pub struct SessionStore {
    sessions: Cache<String, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Cache::builder().max_capacity(SESSION_CAPACITY).build(),
        }
    }

    /// Stores a session, replacing any existing one for the same shop.
    pub fn insert(&self, session: Session) {
        self.sessions
            .insert(session.shop.as_ref().to_string(), session);
    }

    /// Looks up the session for a shop.
    #[must_use]
    pub fn get(&self, shop: &ShopDomain) -> Option<Session> {
        self.sessions.get(shop.as_ref())
    }

    /// Removes all state held for a shop.
    ///
    /// Idempotent: removing a shop that has no session is a no-op, so
    /// redelivered compliance webhooks observe the same outcome.
    pub fn remove(&self, shop: &str) {
        self.sessions.invalidate(shop);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// Verify Session and SessionStore are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
    assert_send_sync::<SessionStore>();
};
