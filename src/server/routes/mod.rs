//! Request handlers, grouped by concern.

pub mod auth;
pub mod insights;
pub mod session;
pub mod webhooks;

use axum::http::{header, HeaderMap};

use crate::auth::{resolver, RequestContext, VerificationStrategy};
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Pulls a header out as a string slice, ignoring non-UTF-8 values.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Resolves the caller's identity from either transport.
///
/// Bearer credentials are preferred; cookie credentials are the fallback
/// for browser traffic. Runs before any business logic so unauthenticated
/// requests never reach the catalog or AI layers.
pub(crate) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<RequestContext, ApiError> {
    let authorization = header_str(headers, header::AUTHORIZATION.as_str());
    let shop_header = header_str(headers, resolver::HEADER_SHOP_DOMAIN);
    let cookie = header_str(headers, header::COOKIE.as_str());

    let context = resolver::resolve_bearer(authorization, shop_header)
        .or_else(|_| resolver::resolve_cookie(cookie))?;

    if state.verification == VerificationStrategy::RemoteCheck {
        resolver::verify_remote(&state.config, &state.http, &context).await?;
    }

    Ok(context)
}
