//! Building the authorization URL that starts an OAuth flow.

use crate::auth::oauth::NonceStore;
use crate::config::{AppConfig, ShopDomain};

/// The outcome of starting an authorization flow.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// Where to redirect the merchant's browser.
    pub auth_url: String,
    /// The state parameter embedded in the URL, already recorded in the
    /// nonce store.
    pub state: String,
}

/// Starts an OAuth authorization flow for a shop.
///
/// Issues a fresh CSRF nonce (replacing any earlier one for the same shop)
/// and builds the provider's authorization URL carrying the client id,
/// requested scopes, redirect URI, and the nonce as `state`.
#[must_use]
pub fn begin_auth(config: &AppConfig, nonces: &dyn NonceStore, shop: &ShopDomain) -> BeginAuthResult {
    let state = nonces.issue(shop);
    let redirect_uri = format!("{}/auth/callback", config.app_url());

    let query = [
        ("client_id", config.api_key().as_ref()),
        ("scope", &config.scopes().to_string()),
        ("redirect_uri", &redirect_uri),
        ("state", &state),
    ]
    .iter()
    .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
    .collect::<Vec<_>>()
    .join("&");

    let auth_url = format!("https://{shop}/admin/oauth/authorize?{query}");

    tracing::debug!(shop = %shop, "issued authorization url");

    BeginAuthResult { auth_url, state }
}
