//! OAuth callback validation and the code-for-token exchange.
//!
//! Validation runs as a pipeline with a fixed order: the shop domain is
//! parsed, the CSRF nonce is consumed and compared, the query signature is
//! verified, and only then is the authorization code exchanged. Consuming
//! the nonce before any other check guarantees a callback burns its nonce
//! even when it goes on to fail, so replays never get a second attempt.

use serde::Serialize;

use crate::auth::oauth::{signature, CallbackQuery, NonceStore, OAuthError};
use crate::auth::{AccessTokenResponse, Session};
use crate::config::{AppConfig, ShopDomain};

/// Request body for the provider's token endpoint.
#[derive(Serialize)]
pub(crate) struct TokenExchangeRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
}

/// Validates an OAuth callback and exchanges the code for a session.
///
/// # Errors
///
/// - [`OAuthError::InvalidCallback`] if the shop domain is malformed.
/// - [`OAuthError::StateMismatch`] if the state parameter does not match the
///   issued nonce (including expiry and replay).
/// - [`OAuthError::InvalidHmac`] if the query signature does not verify.
/// - [`OAuthError::TokenExchangeFailed`] if the provider refuses the code.
pub async fn validate_auth_callback(
    config: &AppConfig,
    nonces: &dyn NonceStore,
    query: &CallbackQuery,
    client: &reqwest::Client,
) -> Result<Session, OAuthError> {
    let shop = ShopDomain::new(&query.shop)
        .map_err(|_| OAuthError::invalid(format!("'{}' is not a valid shop domain", query.shop)))?;

    // Nonce first: the callback burns its nonce even if a later check fails.
    if !nonces.consume(&shop, &query.state) {
        tracing::warn!(shop = %shop, "callback state did not match issued nonce");
        return Err(OAuthError::StateMismatch);
    }

    if !signature::verify_query_signature(query, config.api_secret_key().as_ref()) {
        tracing::warn!(shop = %shop, "callback hmac validation failed");
        return Err(OAuthError::InvalidHmac);
    }

    let token_url = format!("{}/admin/oauth/access_token", config.admin_base(&shop));
    let request = TokenExchangeRequest {
        client_id: config.api_key().as_ref(),
        client_secret: config.api_secret_key().as_ref(),
        code: &query.code,
    };

    let response = exchange_code(client, &token_url, &request).await?;

    tracing::info!(shop = %shop, "oauth flow completed");
    Ok(Session::new(shop, response.access_token, response.scope))
}

/// Posts the authorization code to the token endpoint.
///
/// Split out from the validation pipeline so the HTTP exchange can be
/// exercised directly against a mock server.
pub(crate) async fn exchange_code(
    client: &reqwest::Client,
    token_url: &str,
    request: &TokenExchangeRequest<'_>,
) -> Result<AccessTokenResponse, OAuthError> {
    let response = client
        .post(token_url)
        .json(request)
        .send()
        .await
        .map_err(|err| OAuthError::TokenExchangeFailed {
            status: 0,
            message: format!("transport error: {err}"),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(OAuthError::TokenExchangeFailed {
            status: status.as_u16(),
            message: "token endpoint returned an error status".to_string(),
        });
    }

    response
        .json::<AccessTokenResponse>()
        .await
        .map_err(|_| OAuthError::TokenExchangeFailed {
            status: status.as_u16(),
            message: "token endpoint returned an unparseable body".to_string(),
        })
}
