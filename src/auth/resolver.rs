//! Session resolution for inbound requests.
//!
//! Two credential transports are supported, tried independently depending on
//! route:
//!
//! - **Cookie**: `shoppulse_token` + `shoppulse_shop` cookies set by the
//!   OAuth callback (browser traffic).
//! - **Bearer**: `Authorization: Bearer <token>` + `X-Shopify-Shop-Domain`
//!   header (embedded app / API traffic).
//!
//! Successful resolution yields a [`RequestContext`] that downstream handlers
//! consume; failure short-circuits with an unauthorized response before any
//! business logic runs.
//!
//! By default the credential is trusted on presence alone
//! ([`VerificationStrategy::LocalTrust`]): no round-trip to the provider is
//! made per request. This is a deliberate, documented weak mode;
//! [`VerificationStrategy::RemoteCheck`] re-validates the token against the
//! Admin API on every resolution for deployments that want the stronger
//! guarantee.

use thiserror::Error;

use crate::config::{AppConfig, ShopDomain, ADMIN_API_VERSION};

/// Cookie carrying the access token.
pub const COOKIE_TOKEN: &str = "shoppulse_token";
/// Cookie carrying the shop domain.
pub const COOKIE_SHOP: &str = "shoppulse_shop";
/// Header carrying the shop domain for bearer-token requests.
pub const HEADER_SHOP_DOMAIN: &str = "x-shopify-shop-domain";

/// Why session resolution failed. Surfaced to callers as an opaque 401.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The request carried no usable credential.
    #[error("missing credentials")]
    MissingCredentials,

    /// The shop identifier did not parse as a tenant domain.
    #[error("invalid shop domain")]
    InvalidShop,

    /// Remote re-validation rejected the credential.
    #[error("credential rejected by provider")]
    Rejected,
}

/// How thoroughly a resolved credential is validated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerificationStrategy {
    /// Trust the credential on presence alone (no provider round-trip).
    #[default]
    LocalTrust,
    /// Re-validate the credential against the Admin API on every resolution.
    RemoteCheck,
}

/// Identity established for a single request.
///
/// Ephemeral: derived per inbound request and discarded when the request
/// completes. Never persisted.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// The authenticated shop.
    pub shop: ShopDomain,
    /// The opaque access credential presented.
    pub token: String,
}

/// Resolves a cookie-based session from a `Cookie` request header.
///
/// # Errors
///
/// Returns [`ResolveError::MissingCredentials`] if either cookie is absent,
/// or [`ResolveError::InvalidShop`] if the shop cookie is malformed.
pub fn resolve_cookie(cookie_header: Option<&str>) -> Result<RequestContext, ResolveError> {
    let header = cookie_header.ok_or(ResolveError::MissingCredentials)?;

    let token = cookie_value(header, COOKIE_TOKEN).ok_or(ResolveError::MissingCredentials)?;
    let shop = cookie_value(header, COOKIE_SHOP).ok_or(ResolveError::MissingCredentials)?;

    let shop = ShopDomain::new(shop).map_err(|_| ResolveError::InvalidShop)?;
    Ok(RequestContext {
        shop,
        token: token.to_string(),
    })
}

/// Resolves a bearer-token session from `Authorization` and shop headers.
///
/// # Errors
///
/// Returns [`ResolveError::MissingCredentials`] if the bearer token or shop
/// header is absent, or [`ResolveError::InvalidShop`] if the shop header is
/// malformed.
pub fn resolve_bearer(
    authorization: Option<&str>,
    shop_header: Option<&str>,
) -> Result<RequestContext, ResolveError> {
    let authorization = authorization.ok_or(ResolveError::MissingCredentials)?;
    let token = authorization
        .strip_prefix("Bearer ")
        .ok_or(ResolveError::MissingCredentials)?;
    if token.is_empty() {
        return Err(ResolveError::MissingCredentials);
    }

    let shop = shop_header.ok_or(ResolveError::MissingCredentials)?;
    let shop = ShopDomain::new(shop).map_err(|_| ResolveError::InvalidShop)?;

    Ok(RequestContext {
        shop,
        token: token.to_string(),
    })
}

/// Re-validates a resolved credential against the provider.
///
/// Only called when the configured strategy is
/// [`VerificationStrategy::RemoteCheck`]; a cheap `shop.json` read with the
/// presented token distinguishes a live credential from a revoked one.
///
/// # Errors
///
/// Returns [`ResolveError::Rejected`] if the provider does not accept the
/// token.
pub async fn verify_remote(
    config: &AppConfig,
    client: &reqwest::Client,
    context: &RequestContext,
) -> Result<(), ResolveError> {
    let url = format!(
        "{}/admin/api/{ADMIN_API_VERSION}/shop.json",
        config.admin_base(&context.shop)
    );

    let response = client
        .get(&url)
        .header("X-Shopify-Access-Token", &context.token)
        .send()
        .await
        .map_err(|_| ResolveError::Rejected)?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(ResolveError::Rejected)
    }
}

/// Extracts a cookie value from a `Cookie` header.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name && !v.is_empty()).then_some(v)
    })
}
