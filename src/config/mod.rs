//! Application configuration.
//!
//! Configuration is instance-based and passed explicitly; there is no global
//! state. [`AppConfig`] can be built programmatically through
//! [`AppConfigBuilder`] or loaded from the environment via
//! [`AppConfig::from_env`], which recognizes:
//!
//! - `SHOPIFY_API_KEY` / `SHOPIFY_API_SECRET` — OAuth client credentials
//! - `SHOPIFY_SCOPES` — requested permission scopes (comma-separated)
//! - `APP_URL` — public base URL of this application
//! - `OPENAI_API_KEY` — AI provider key (absent: mock responses)
//! - `APP_ENV` — `development` (default) or `production`
//! - `HOST` / `PORT` — server bind address
//!
//! In development every credential has a dummy fallback so the server starts
//! without secrets, and anything derived from a dummy value is returned as
//! clearly labeled mock output rather than pretending to be live data.

mod newtypes;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};

use std::net::SocketAddr;

use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Admin API version used for token-authenticated provider calls.
pub const ADMIN_API_VERSION: &str = "2023-10";

/// Scopes requested when `SHOPIFY_SCOPES` is not set.
pub const DEFAULT_SCOPES: &str =
    "read_products,write_products,read_customers,read_orders,write_orders";

const DUMMY_API_KEY: &str = "dummy-api-key";
const DUMMY_API_SECRET: &str = "dummy-api-secret";
const DEFAULT_APP_URL: &str = "http://localhost:3000";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Runtime environment flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Local development: dummy credentials allowed, mock data returned.
    Development,
    /// Production: provider calls are made for real.
    Production,
}

impl Environment {
    /// Returns `true` for [`Environment::Development`].
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Application configuration.
///
/// `AppConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across async tasks.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    scopes: AuthScopes,
    app_url: HostUrl,
    environment: Environment,
    openai_api_key: Option<String>,
    admin_base_override: Option<String>,
    bind_addr: SocketAddr,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Loads configuration from environment variables.
    ///
    /// Missing credentials fall back to dummy development values; a warning
    /// is logged for each fallback so a misconfigured production deployment
    /// is visible immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provided value fails validation (e.g. a
    /// malformed `APP_URL` or non-numeric `PORT`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_key = match std::env::var("SHOPIFY_API_KEY") {
            Ok(v) => ApiKey::new(v)?,
            Err(_) => {
                tracing::warn!("SHOPIFY_API_KEY not set, using dummy development credentials");
                ApiKey::new(DUMMY_API_KEY)?
            }
        };

        let api_secret_key = match std::env::var("SHOPIFY_API_SECRET") {
            Ok(v) => ApiSecretKey::new(v)?,
            Err(_) => {
                tracing::warn!("SHOPIFY_API_SECRET not set, using dummy development secret");
                ApiSecretKey::new(DUMMY_API_SECRET)?
            }
        };

        let scopes: AuthScopes = std::env::var("SHOPIFY_SCOPES")
            .unwrap_or_else(|_| DEFAULT_SCOPES.to_string())
            .parse()?;

        let app_url = HostUrl::new(
            std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
        )?;

        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        if openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, AI features will return mock data");
        }

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: "HOST/PORT",
                    reason: format!("'{host}:{port}' is not a valid socket address"),
                })?;

        Ok(Self {
            api_key,
            api_secret_key,
            scopes,
            app_url,
            environment,
            openai_api_key,
            admin_base_override: None,
            bind_addr,
        })
    }

    /// Returns the API key (OAuth client identifier).
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key.
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the requested permission scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the public base URL of the application.
    #[must_use]
    pub const fn app_url(&self) -> &HostUrl {
        &self.app_url
    }

    /// Returns the runtime environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the AI provider API key, if configured.
    #[must_use]
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }

    /// Returns the address the server binary binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Returns `true` when running on dummy development credentials.
    #[must_use]
    pub fn uses_dummy_credentials(&self) -> bool {
        self.api_key.as_ref() == DUMMY_API_KEY
    }

    /// Returns the base URL for provider calls scoped to `shop`.
    ///
    /// Normally `https://{shop}`; the override points all identity-provider
    /// traffic (token exchange, webhook registration, Admin API) at a single
    /// alternative base, which is how the test suite substitutes a mock
    /// provider.
    #[must_use]
    pub fn admin_base(&self, shop: &ShopDomain) -> String {
        self.admin_base_override
            .clone()
            .unwrap_or_else(|| format!("https://{}", shop.as_ref()))
    }
}

/// Builder for [`AppConfig`].
///
/// Required fields are `api_key`, `api_secret_key`, and `app_url`; all other
/// fields have defaults suitable for development.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    app_url: Option<HostUrl>,
    environment: Option<Environment>,
    openai_api_key: Option<String>,
    admin_base_override: Option<String>,
    bind_addr: Option<SocketAddr>,
}

impl AppConfigBuilder {
    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the requested permission scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the public application base URL (required).
    #[must_use]
    pub fn app_url(mut self, url: HostUrl) -> Self {
        self.app_url = Some(url);
        self
    }

    /// Sets the runtime environment.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Sets the AI provider API key.
    #[must_use]
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Redirects all provider calls to the given base URL (tests/dev only).
    #[must_use]
    pub fn admin_base_override(mut self, base: impl Into<String>) -> Self {
        self.admin_base_override = Some(base.into());
        self
    }

    /// Sets the server bind address.
    #[must_use]
    pub const fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Builds the [`AppConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key`,
    /// `api_secret_key`, or `app_url` are not set.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;
        let app_url = self
            .app_url
            .ok_or(ConfigError::MissingRequiredField { field: "app_url" })?;

        Ok(AppConfig {
            api_key,
            api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            app_url,
            environment: self.environment.unwrap_or(Environment::Development),
            openai_api_key: self.openai_api_key,
            admin_base_override: self.admin_base_override,
            bind_addr: self
                .bind_addr
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.parse().unwrap_or_else(|_| unreachable!())),
        })
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};
