//! ShopPulseAI backend: Shopify OAuth, webhook compliance, and AI-assisted
//! merchant insights.
//!
//! The crate is organized around a transport-independent core with a thin
//! HTTP adapter on top:
//!
//! - [`config`] — validated configuration, loaded from the environment or
//!   built programmatically.
//! - [`auth`] — the OAuth authorization-code flow (CSRF nonces, HMAC
//!   verification, token exchange), sessions, and per-request resolution.
//! - [`webhooks`] — delivery verification, compliance topic handling, and
//!   best-effort registration.
//! - [`catalog`] — product listing through the Admin API.
//! - [`ai`] — AI-backed recommendations and price suggestions with
//!   deterministic fallbacks.
//! - [`server`] — the axum adapter wiring the above to HTTP.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use shoppulse::config::AppConfig;
//! use shoppulse::server::{router, AppState};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let addr = config.bind_addr();
//! let app = router(AppState::new(config));
//!
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod server;
pub mod webhooks;

pub use auth::{AuthScopes, Session, SessionStore};
pub use config::{ApiKey, ApiSecretKey, AppConfig, HostUrl, ShopDomain};
pub use error::ConfigError;
