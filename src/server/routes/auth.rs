//! OAuth endpoints: flow start, callback, and cookie-session validation.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, RawQuery, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::oauth::{begin_auth, validate_auth_callback, CallbackQuery};
use crate::auth::resolver::{self, COOKIE_SHOP, COOKIE_TOKEN};
use crate::config::ShopDomain;
use crate::server::error::ApiError;
use crate::server::routes::header_str;
use crate::server::state::AppState;
use crate::webhooks::register_compliance_webhooks;

/// `GET /auth` — starts the OAuth flow for a shop.
///
/// Redirects (302) to the provider's consent screen. A missing or invalid
/// `shop` parameter is a 400; no nonce is issued in that case.
pub async fn begin(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let shop = params
        .get("shop")
        .ok_or_else(|| ApiError::BadRequest("missing shop parameter".to_string()))?;
    let shop = ShopDomain::new(shop)
        .map_err(|_| ApiError::BadRequest(format!("'{shop}' is not a valid shop domain")))?;

    let result = begin_auth(&state.config, state.nonces.as_ref(), &shop);
    Ok(found(result.auth_url))
}

/// `GET /auth/shopify` — legacy entry point kept for installed links.
///
/// Forwards to `/auth` with the original query string intact.
pub async fn liveness(RawQuery(query): RawQuery) -> Response {
    let target = match query {
        Some(q) if !q.is_empty() => format!("/auth?{q}"),
        _ => "/auth".to_string(),
    };
    found(target)
}

/// `GET /auth/callback` — completes the OAuth flow.
///
/// On success, stores the session, kicks off best-effort webhook
/// registration in the background, and redirects (302) to the dashboard
/// with the session cookies set.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let query = CallbackQuery::from_params(params)?;
    let session =
        validate_auth_callback(&state.config, state.nonces.as_ref(), &query, &state.http).await?;

    let shop = session.shop.clone();
    let access_token = session.access_token.clone();
    state.sessions.insert(session.clone());

    // Registration must never delay or fail the install.
    let config = Arc::clone(&state.config);
    let http = state.http.clone();
    tokio::spawn(async move {
        register_compliance_webhooks(&config, &http, &session).await;
    });

    let cookie_attrs = "Path=/; HttpOnly; Secure; SameSite=None";
    let token_cookie = format!("{COOKIE_TOKEN}={access_token}; {cookie_attrs}");
    let shop_cookie = format!("{COOKIE_SHOP}={shop}; {cookie_attrs}");

    Ok((
        StatusCode::FOUND,
        AppendHeaders([
            (SET_COOKIE, token_cookie),
            (SET_COOKIE, shop_cookie),
            (LOCATION, format!("/dashboard?shop={shop}")),
        ]),
    )
        .into_response())
}

/// `GET /auth/validate-session` — checks the cookie-based session.
///
/// Returns `{"valid": true, "shop": ...}` or a 401 with `{"valid": false}`.
pub async fn validate_session(headers: HeaderMap) -> Response {
    let cookie = header_str(&headers, axum::http::header::COOKIE.as_str());
    match resolver::resolve_cookie(cookie) {
        Ok(context) => Json(json!({ "valid": true, "shop": context.shop })).into_response(),
        Err(err) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "valid": false, "error": err.to_string() })),
        )
            .into_response(),
    }
}

/// Builds a 302 response; the provider flow depends on 302 rather than the
/// 303 that [`axum::response::Redirect`] produces.
fn found(location: String) -> Response {
    (StatusCode::FOUND, AppendHeaders([(LOCATION, location)])).into_response()
}
