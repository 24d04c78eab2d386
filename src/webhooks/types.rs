//! Webhook topics and delivery headers.

use std::fmt;
use std::str::FromStr;

use crate::webhooks::WebhookError;

/// Header carrying the base64 HMAC-SHA256 signature of the delivery body.
pub const HEADER_HMAC: &str = "x-shopify-hmac-sha256";
/// Header carrying the topic of the delivery.
pub const HEADER_TOPIC: &str = "x-shopify-topic";
/// Header carrying the shop the delivery concerns.
pub const HEADER_SHOP_DOMAIN: &str = "x-shopify-shop-domain";

/// Webhook topics this application subscribes to.
///
/// The first three are the mandatory GDPR compliance topics every public
/// app must handle; `app/uninstalled` additionally tears down local state
/// when a merchant removes the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WebhookTopic {
    /// A customer requested an export of their data.
    CustomersDataRequest,
    /// A customer requested erasure of their data.
    CustomersRedact,
    /// The shop itself was deleted; erase everything held for it.
    ShopRedact,
    /// The merchant uninstalled the app.
    AppUninstalled,
}

impl WebhookTopic {
    /// The three compliance topics registered for every shop at install time.
    pub const COMPLIANCE: [Self; 3] = [
        Self::CustomersDataRequest,
        Self::CustomersRedact,
        Self::ShopRedact,
    ];

    /// Returns the topic in Shopify's `resource/event` notation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomersDataRequest => "customers/data_request",
            Self::CustomersRedact => "customers/redact",
            Self::ShopRedact => "shop/redact",
            Self::AppUninstalled => "app/uninstalled",
        }
    }
}

impl FromStr for WebhookTopic {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers/data_request" => Ok(Self::CustomersDataRequest),
            "customers/redact" => Ok(Self::CustomersRedact),
            "shop/redact" => Ok(Self::ShopRedact),
            "app/uninstalled" => Ok(Self::AppUninstalled),
            other => Err(WebhookError::UnknownTopic {
                topic: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for WebhookTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
