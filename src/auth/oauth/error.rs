//! Errors raised while validating an OAuth callback.

use thiserror::Error;

/// Why an OAuth callback was rejected.
///
/// Variants are ordered by the validation pipeline: structural checks first,
/// then the CSRF nonce, then the signature, then the token exchange. Each
/// maps to a distinct HTTP status at the transport layer.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The callback was structurally unusable (missing parameters, bad shop
    /// domain). Maps to 400.
    #[error("invalid callback: {reason}")]
    InvalidCallback {
        /// What was malformed.
        reason: String,
    },

    /// The state parameter did not match the issued nonce, the nonce
    /// expired, or the callback was replayed. Maps to 403.
    #[error("state parameter mismatch")]
    StateMismatch,

    /// The query signature did not verify against the shared secret.
    /// Maps to 403.
    #[error("hmac validation failed")]
    InvalidHmac,

    /// The provider refused to exchange the authorization code for a token.
    /// Maps to 500; the grant is gone either way.
    #[error("token exchange failed with status {status}")]
    TokenExchangeFailed {
        /// HTTP status returned by the token endpoint, or 0 for transport
        /// failures.
        status: u16,
        /// Short description safe to log (never contains credentials).
        message: String,
    },
}

impl OAuthError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCallback {
            reason: reason.into(),
        }
    }
}
