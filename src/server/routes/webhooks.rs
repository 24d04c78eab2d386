//! Webhook receiving endpoint.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use crate::server::error::ApiError;
use crate::server::routes::header_str;
use crate::server::state::AppState;
use crate::webhooks::{
    verify_signature, ComplianceHandlers, WebhookError, WebhookTopic, HEADER_HMAC,
    HEADER_SHOP_DOMAIN,
};

/// `POST /webhooks/{topic}` — receives a webhook delivery.
///
/// The raw body is authenticated against the signature header before
/// anything (topic included) is interpreted. Unsigned or badly signed
/// deliveries are 401; a verified delivery for a topic this app does not
/// subscribe to is 404.
pub async fn receive(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    verify_signature(
        &body,
        header_str(&headers, HEADER_HMAC),
        state.config.api_secret_key().as_ref(),
    )?;

    let topic: WebhookTopic = topic.parse()?;
    let shop = header_str(&headers, HEADER_SHOP_DOMAIN)
        .ok_or(WebhookError::MissingShopDomain)?;

    let handlers = ComplianceHandlers::new(state.sessions.clone());
    Ok(handlers.handle(topic, shop))
}
