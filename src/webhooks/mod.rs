//! Webhook receipt, verification, registration, and handling.

mod errors;
mod handlers;
mod registry;
mod types;
mod verification;

pub use errors::WebhookError;
pub use handlers::ComplianceHandlers;
pub use registry::register_compliance_webhooks;
pub use types::{WebhookTopic, HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC};
pub use verification::verify_signature;
