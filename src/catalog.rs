//! Product catalog access.
//!
//! Reads the shop's products through the Admin API and flattens them to the
//! `{id, title, price}` shape the dashboard consumes. On dummy development
//! credentials a labeled sample catalog is returned instead of calling out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::RequestContext;
use crate::config::{AppConfig, ADMIN_API_VERSION};

/// Why a catalog read failed.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The Admin API returned an error status.
    #[error("product listing failed with status {status}")]
    Upstream {
        /// Status returned by the Admin API.
        status: u16,
    },

    /// The Admin API could not be reached or returned an unusable body.
    #[error("product listing failed: {reason}")]
    Transport {
        /// Short description safe to log.
        reason: String,
    },
}

/// A product flattened for the dashboard.
#[derive(Clone, Debug, Serialize)]
pub struct ProductSummary {
    /// Provider product id.
    pub id: u64,
    /// Product title.
    pub title: String,
    /// Price of the first variant.
    pub price: f64,
}

#[derive(Deserialize)]
struct ProductsResponse {
    products: Vec<AdminProduct>,
}

#[derive(Deserialize)]
struct AdminProduct {
    id: u64,
    title: String,
    #[serde(default)]
    variants: Vec<AdminVariant>,
}

#[derive(Deserialize)]
struct AdminVariant {
    // The Admin API serializes prices as strings.
    price: String,
}

/// Lists the shop's products.
///
/// # Errors
///
/// Returns [`CatalogError`] when the Admin API call fails. Never fails on
/// dummy credentials, where the sample catalog is returned instead.
pub async fn list_products(
    config: &AppConfig,
    client: &reqwest::Client,
    context: &RequestContext,
) -> Result<Vec<ProductSummary>, CatalogError> {
    if config.uses_dummy_credentials() {
        tracing::debug!(shop = %context.shop, "serving sample catalog (dummy credentials)");
        return Ok(sample_catalog());
    }

    let url = format!(
        "{}/admin/api/{ADMIN_API_VERSION}/products.json",
        config.admin_base(&context.shop)
    );

    let response = client
        .get(&url)
        .header("X-Shopify-Access-Token", &context.token)
        .send()
        .await
        .map_err(|err| CatalogError::Transport {
            reason: format!("request failed: {err}"),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Upstream {
            status: status.as_u16(),
        });
    }

    let parsed: ProductsResponse =
        response.json().await.map_err(|_| CatalogError::Transport {
            reason: "unparseable product listing body".to_string(),
        })?;

    Ok(parsed
        .products
        .into_iter()
        .map(|product| {
            let price = product
                .variants
                .first()
                .and_then(|v| v.price.parse::<f64>().ok())
                .unwrap_or(0.0);
            ProductSummary {
                id: product.id,
                title: product.title,
                price,
            }
        })
        .collect())
}

fn sample_catalog() -> Vec<ProductSummary> {
    vec![
        ProductSummary {
            id: 1,
            title: "[Sample] Classic Cotton Tee".to_string(),
            price: 24.99,
        },
        ProductSummary {
            id: 2,
            title: "[Sample] Enamel Camp Mug".to_string(),
            price: 14.5,
        },
        ProductSummary {
            id: 3,
            title: "[Sample] Canvas Tote Bag".to_string(),
            price: 19.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context() -> RequestContext {
        RequestContext {
            shop: ShopDomain::new("test.myshopify.com").unwrap(),
            token: "shpat_token".to_string(),
        }
    }

    fn live_config(admin_base: &str) -> AppConfig {
        AppConfig::builder()
            .api_key(ApiKey::new("real-key").unwrap())
            .api_secret_key(ApiSecretKey::new("real-secret").unwrap())
            .app_url(HostUrl::new("https://myapp.example.com").unwrap())
            .admin_base_override(admin_base)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_dummy_credentials_serve_labeled_samples() {
        let config = AppConfig::builder()
            .api_key(ApiKey::new("dummy-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("dummy-api-secret").unwrap())
            .app_url(HostUrl::new("https://myapp.example.com").unwrap())
            .build()
            .unwrap();

        let products = list_products(&config, &reqwest::Client::new(), &context())
            .await
            .unwrap();
        assert!(!products.is_empty());
        assert!(products.iter().all(|p| p.title.starts_with("[Sample]")));
    }

    #[tokio::test]
    async fn test_live_listing_flattens_first_variant_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2023-10/products.json"))
            .and(header("X-Shopify-Access-Token", "shpat_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "products": [
                    {"id": 101, "title": "Mug", "variants": [{"price": "14.50"}, {"price": "99.00"}]},
                    {"id": 102, "title": "Tee", "variants": []},
                ]
            })))
            .mount(&server)
            .await;

        let config = live_config(&server.uri());
        let products = list_products(&config, &reqwest::Client::new(), &context())
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 101);
        assert!((products[0].price - 14.5).abs() < f64::EPSILON);
        // No variants: price defaults to zero rather than failing the listing.
        assert!((products[1].price - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_upstream_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2023-10/products.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = live_config(&server.uri());
        let err = list_products(&config, &reqwest::Client::new(), &context())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Upstream { status: 401 }));
    }
}
