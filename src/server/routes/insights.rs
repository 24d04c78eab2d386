//! Authenticated dashboard endpoints: products and AI insights.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ai::ProductInput;
use crate::catalog::{self, ProductSummary};
use crate::server::error::ApiError;
use crate::server::routes::authenticate;
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct PriceOptimizeRequest {
    #[serde(default)]
    products: Vec<ProductInput>,
}

/// `GET /products` — lists the shop's products as a bare array.
pub async fn products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    let context = authenticate(&state, &headers).await?;
    let products = catalog::list_products(&state.config, &state.http, &context).await?;
    Ok(Json(products))
}

/// `POST /recommendations` — generates a merchandising recommendation.
///
/// The body must carry a `trackingData` field; authentication is checked
/// before the AI layer is touched.
pub async fn recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let context = authenticate(&state, &headers).await?;

    let tracking_data = body
        .get("trackingData")
        .ok_or_else(|| ApiError::BadRequest("trackingData is required".to_string()))?;

    tracing::debug!(shop = %context.shop, "generating recommendation");
    let recommendation = state.ai.recommend(tracking_data).await;

    Ok(Json(json!({
        "recommendation": recommendation,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// `POST /price-optimize` — suggests a new price per submitted product.
pub async fn price_optimize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PriceOptimizeRequest>,
) -> Result<Json<Value>, ApiError> {
    let context = authenticate(&state, &headers).await?;

    if body.products.is_empty() {
        return Err(ApiError::BadRequest("No products provided".to_string()));
    }

    tracing::debug!(
        shop = %context.shop,
        count = body.products.len(),
        "optimizing prices"
    );
    let suggestions = state.ai.optimize_prices(&body.products).await;

    Ok(Json(json!({ "products": suggestions })))
}
