//! Errors raised while receiving webhook deliveries.

use thiserror::Error;

/// Why a webhook delivery was rejected.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was absent. Maps to 401.
    #[error("missing webhook signature header")]
    MissingSignature,

    /// The body signature did not verify against the shared secret.
    /// Maps to 401.
    #[error("webhook signature verification failed")]
    InvalidSignature,

    /// The delivery named a topic this application does not handle.
    /// Maps to 404.
    #[error("unknown webhook topic '{topic}'")]
    UnknownTopic {
        /// The topic as delivered.
        topic: String,
    },

    /// The delivery did not carry a shop domain header. Maps to 400.
    #[error("missing shop domain header")]
    MissingShopDomain,
}
