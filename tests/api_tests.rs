//! Authenticated API tests: products, recommendations, price optimization.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use shoppulse::config::{ApiKey, ApiSecretKey, AppConfig, HostUrl};
use shoppulse::server::{router, AppState};

const SHOP: &str = "test.myshopify.com";

fn dummy_state() -> AppState {
    // Dummy credentials: catalog serves samples, AI serves labeled mocks.
    let config = AppConfig::builder()
        .api_key(ApiKey::new("dummy-api-key").unwrap())
        .api_secret_key(ApiSecretKey::new("dummy-api-secret").unwrap())
        .app_url(HostUrl::new("https://myapp.example.com").unwrap())
        .build()
        .unwrap();
    AppState::new(config)
}

fn with_cookie(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder.header(
        header::COOKIE,
        format!("shoppulse_token=tok; shoppulse_shop={SHOP}"),
    )
}

fn with_bearer(builder: axum::http::request::Builder) -> axum::http::request::Builder {
    builder
        .header(header::AUTHORIZATION, "Bearer tok")
        .header("x-shopify-shop-domain", SHOP)
}

async fn json_body(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn products_requires_authentication() {
    let app = router(dummy_state());

    let response = app
        .oneshot(Request::get("/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn products_returns_bare_array_with_cookie_auth() {
    let app = router(dummy_state());

    let response = app
        .oneshot(
            with_cookie(Request::get("/products"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let products = json.as_array().expect("body should be a bare array");
    assert!(!products.is_empty());
    for product in products {
        assert!(product.get("id").is_some());
        assert!(product.get("title").is_some());
        assert!(product.get("price").is_some());
    }
}

#[tokio::test]
async fn products_accepts_bearer_auth() {
    let app = router(dummy_state());

    let response = app
        .oneshot(
            with_bearer(Request::get("/products"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn recommendations_rejects_unauthenticated_before_ai() {
    let app = router(dummy_state());

    let response = app
        .oneshot(
            Request::post("/recommendations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"trackingData":{"views":10}}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn recommendations_requires_tracking_data() {
    let app = router(dummy_state());

    let response = app
        .oneshot(
            with_cookie(Request::post("/recommendations"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommendations_returns_labeled_mock_without_ai_key() {
    let app = router(dummy_state());

    let response = app
        .oneshot(
            with_cookie(Request::post("/recommendations"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"trackingData":{"views":10,"carts":2}}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let recommendation = json["recommendation"].as_str().unwrap();
    assert!(recommendation.starts_with("[Mock]"));
    // RFC 3339 timestamp alongside the text.
    let timestamp = json["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn price_optimize_rejects_empty_product_list() {
    let app = router(dummy_state());

    for body in [r#"{}"#, r#"{"products":[]}"#] {
        let response = app
            .clone()
            .oneshot(
                with_cookie(Request::post("/price-optimize"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No products provided");
    }
}

#[tokio::test]
async fn price_optimize_suggests_higher_mock_prices() {
    let app = router(dummy_state());

    let response = app
        .oneshot(
            with_cookie(Request::post("/price-optimize"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"products":[{"id":1,"title":"Widget","price":10.0}]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let suggestion = &json["products"][0];
    assert_eq!(suggestion["originalPrice"], 10.0);
    assert!(suggestion["suggestedPrice"].as_f64().unwrap() > 10.0);
    assert!(suggestion["reasoning"].as_str().unwrap().starts_with("[Mock]"));
}

#[tokio::test]
async fn verify_session_requires_bearer_credentials() {
    let app = router(dummy_state());

    let anonymous = app
        .clone()
        .oneshot(Request::get("/verify-session").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let authed = app
        .oneshot(
            with_bearer(Request::get("/verify-session"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authed.status(), StatusCode::OK);
    let json = json_body(authed).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["shop"], SHOP);
}
