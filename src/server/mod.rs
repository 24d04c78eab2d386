//! The HTTP transport adapter.
//!
//! A thin axum layer over the auth, webhook, catalog, and AI modules. All
//! semantics live in those modules; handlers only translate between HTTP
//! and domain types.

pub mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth", get(routes::auth::begin))
        .route("/auth/shopify", get(routes::auth::liveness))
        .route("/auth/callback", get(routes::auth::callback))
        .route("/auth/validate-session", get(routes::auth::validate_session))
        .route("/verify-session", get(routes::session::verify))
        .route("/webhooks/*topic", post(routes::webhooks::receive))
        .route("/products", get(routes::insights::products))
        .route("/recommendations", post(routes::insights::recommendations))
        .route("/price-optimize", post(routes::insights::price_optimize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
