//! The query parameters delivered to the OAuth callback endpoint.

use std::collections::BTreeMap;

use crate::auth::oauth::OAuthError;

/// Query parameters from an OAuth authorization callback.
///
/// Shopify signs the entire query string, so unknown parameters must be
/// preserved for signature verification even though only `code`, `shop`,
/// `state`, and `hmac` carry meaning here. Extras (like `host` and
/// `timestamp`) are kept in `extra` and folded back in when building the
/// signable string.
#[derive(Clone, Debug)]
pub struct CallbackQuery {
    /// The authorization code to exchange for an access token.
    pub code: String,
    /// The shop domain as delivered (validated later against [`crate::config::ShopDomain`]).
    pub shop: String,
    /// The CSRF state parameter; empty if the provider omitted it.
    pub state: String,
    /// The hex-encoded HMAC-SHA256 signature over the other parameters.
    pub hmac: String,
    /// All other query parameters, preserved for signature verification.
    pub extra: BTreeMap<String, String>,
}

impl CallbackQuery {
    /// Builds a callback query from raw query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidCallback`] if `shop`, `code`, or `hmac`
    /// is absent. A missing `state` is tolerated here so the nonce check can
    /// reject it as a mismatch rather than a malformed request.
    pub fn from_params(mut params: BTreeMap<String, String>) -> Result<Self, OAuthError> {
        let shop = params
            .remove("shop")
            .ok_or_else(|| OAuthError::invalid("missing shop parameter"))?;
        let code = params
            .remove("code")
            .ok_or_else(|| OAuthError::invalid("missing code parameter"))?;
        let hmac = params
            .remove("hmac")
            .ok_or_else(|| OAuthError::invalid("missing hmac parameter"))?;
        let state = params.remove("state").unwrap_or_default();

        Ok(Self {
            code,
            shop,
            state,
            hmac,
            extra: params,
        })
    }

    /// Builds the message the provider signed.
    ///
    /// All parameters except `hmac` are sorted lexicographically by key and
    /// re-encoded as `key=value` pairs joined with `&`, with both keys and
    /// values percent-encoded. An empty `state` is treated as absent.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        let mut params: BTreeMap<&str, &str> = BTreeMap::new();
        params.insert("code", &self.code);
        params.insert("shop", &self.shop);
        if !self.state.is_empty() {
            params.insert("state", &self.state);
        }
        for (key, value) in &self.extra {
            params.insert(key, value);
        }

        params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
