//! Webhook delivery authentication.
//!
//! Every delivery is authenticated against the raw request body before any
//! parsing happens: the body bytes are signed, so any interpretation (JSON
//! decoding included) must wait until the signature is known good.

use crate::auth::oauth::signature;
use crate::webhooks::WebhookError;

/// Verifies the signature header of a webhook delivery.
///
/// `provided` is the value of the `X-Shopify-Hmac-SHA256` header, or `None`
/// if the header was absent. The body must be the exact bytes as delivered.
///
/// # Errors
///
/// Returns [`WebhookError::MissingSignature`] when the header is absent and
/// [`WebhookError::InvalidSignature`] when it does not verify. A malformed
/// header value (not base64, wrong length) fails verification the same way
/// a forged one does.
pub fn verify_signature(
    body: &[u8],
    provided: Option<&str>,
    secret: &str,
) -> Result<(), WebhookError> {
    let provided = provided.ok_or(WebhookError::MissingSignature)?;

    if signature::verify_body_signature(body, provided, secret) {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}
