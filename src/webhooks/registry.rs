//! Compliance webhook registration.
//!
//! Registration happens once per successful install, after the OAuth
//! callback completes. It is strictly best-effort: a registration failure
//! must never fail or delay the install, so each topic is attempted
//! independently, failures are logged, and the caller learns only how many
//! succeeded.

use serde::Serialize;

use crate::auth::Session;
use crate::config::{AppConfig, ADMIN_API_VERSION};
use crate::webhooks::WebhookTopic;

#[derive(Serialize)]
struct WebhookSubscription<'a> {
    topic: &'a str,
    address: String,
    format: &'static str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    webhook: WebhookSubscription<'a>,
}

/// Registers the mandatory compliance topics for a freshly installed shop.
///
/// All three registrations run concurrently against the shop's Admin API.
/// Returns how many succeeded; failures are logged at warn level and
/// otherwise swallowed.
pub async fn register_compliance_webhooks(
    config: &AppConfig,
    client: &reqwest::Client,
    session: &Session,
) -> usize {
    let endpoint = format!(
        "{}/admin/api/{ADMIN_API_VERSION}/webhooks.json",
        config.admin_base(&session.shop)
    );

    let [a, b, c] = WebhookTopic::COMPLIANCE;
    let (a, b, c) = tokio::join!(
        register_topic(config, client, session, &endpoint, a),
        register_topic(config, client, session, &endpoint, b),
        register_topic(config, client, session, &endpoint, c),
    );

    let registered = usize::from(a) + usize::from(b) + usize::from(c);
    tracing::info!(
        shop = %session.shop,
        registered,
        total = WebhookTopic::COMPLIANCE.len(),
        "compliance webhook registration finished"
    );
    registered
}

async fn register_topic(
    config: &AppConfig,
    client: &reqwest::Client,
    session: &Session,
    endpoint: &str,
    topic: WebhookTopic,
) -> bool {
    let request = RegisterRequest {
        webhook: WebhookSubscription {
            topic: topic.as_str(),
            address: format!("{}/webhooks/{}", config.app_url(), topic.as_str()),
            format: "json",
        },
    };

    let result = client
        .post(endpoint)
        .header("X-Shopify-Access-Token", &session.access_token)
        .json(&request)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(shop = %session.shop, topic = %topic, "registered webhook");
            true
        }
        Ok(response) => {
            tracing::warn!(
                shop = %session.shop,
                topic = %topic,
                status = %response.status(),
                "webhook registration rejected"
            );
            false
        }
        Err(err) => {
            tracing::warn!(
                shop = %session.shop,
                topic = %topic,
                error = %err,
                "webhook registration failed"
            );
            false
        }
    }
}
