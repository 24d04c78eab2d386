//! Topic handlers for verified webhook deliveries.

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::webhooks::WebhookTopic;

/// Handles verified compliance and lifecycle deliveries.
///
/// Handlers run only after the delivery signature has been verified. All of
/// them are idempotent: redelivery of the same event observes the same
/// outcome, because the only local effect is removing per-shop state and
/// removal of absent state is a no-op.
pub struct ComplianceHandlers {
    sessions: Arc<SessionStore>,
}

impl ComplianceHandlers {
    /// Creates handlers backed by the given session store.
    #[must_use]
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Dispatches a verified delivery to its topic handler.
    ///
    /// Returns the acknowledgement body sent back to the provider.
    pub fn handle(&self, topic: WebhookTopic, shop: &str) -> &'static str {
        match topic {
            WebhookTopic::CustomersDataRequest => {
                // No customer data is stored locally; acknowledge so the
                // provider can close out the request.
                tracing::info!(shop, topic = %topic, "customer data request acknowledged");
                "customer data request received"
            }
            WebhookTopic::CustomersRedact => {
                tracing::info!(shop, topic = %topic, "customer redact acknowledged");
                "customer redact received"
            }
            WebhookTopic::ShopRedact => {
                self.sessions.remove(shop);
                tracing::info!(shop, topic = %topic, "shop data redacted");
                "shop redact received"
            }
            WebhookTopic::AppUninstalled => {
                self.sessions.remove(shop);
                tracing::info!(shop, topic = %topic, "app uninstalled, session removed");
                "app uninstall processed"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::config::ShopDomain;

    fn store_with_session() -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new());
        store.insert(Session::new(
            ShopDomain::new("test.myshopify.com").unwrap(),
            "token",
            "",
        ));
        store
    }

    #[test]
    fn test_uninstall_removes_session() {
        let store = store_with_session();
        let handlers = ComplianceHandlers::new(Arc::clone(&store));

        handlers.handle(WebhookTopic::AppUninstalled, "test.myshopify.com");
        assert!(store
            .get(&ShopDomain::new("test.myshopify.com").unwrap())
            .is_none());
    }

    #[test]
    fn test_shop_redact_removes_session() {
        let store = store_with_session();
        let handlers = ComplianceHandlers::new(Arc::clone(&store));

        handlers.handle(WebhookTopic::ShopRedact, "test.myshopify.com");
        assert!(store
            .get(&ShopDomain::new("test.myshopify.com").unwrap())
            .is_none());
    }

    #[test]
    fn test_customer_topics_do_not_touch_sessions() {
        let store = store_with_session();
        let handlers = ComplianceHandlers::new(Arc::clone(&store));

        handlers.handle(WebhookTopic::CustomersDataRequest, "test.myshopify.com");
        handlers.handle(WebhookTopic::CustomersRedact, "test.myshopify.com");
        assert!(store
            .get(&ShopDomain::new("test.myshopify.com").unwrap())
            .is_some());
    }

    #[test]
    fn test_redelivery_is_idempotent() {
        let store = store_with_session();
        let handlers = ComplianceHandlers::new(Arc::clone(&store));

        let first = handlers.handle(WebhookTopic::AppUninstalled, "test.myshopify.com");
        let second = handlers.handle(WebhookTopic::AppUninstalled, "test.myshopify.com");
        assert_eq!(first, second);
    }
}
