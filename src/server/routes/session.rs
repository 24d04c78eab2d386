//! Bearer-token session verification.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{resolver, VerificationStrategy};
use crate::server::error::ApiError;
use crate::server::routes::header_str;
use crate::server::state::AppState;

/// `GET /verify-session` — checks a bearer-token session.
///
/// Requires `Authorization: Bearer <token>` and the shop domain header.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let authorization = header_str(&headers, header::AUTHORIZATION.as_str());
    let shop_header = header_str(&headers, resolver::HEADER_SHOP_DOMAIN);

    let context = resolver::resolve_bearer(authorization, shop_header)?;

    if state.verification == VerificationStrategy::RemoteCheck {
        resolver::verify_remote(&state.config, &state.http, &context).await?;
    }

    Ok(Json(json!({ "status": "ok", "shop": context.shop })))
}
