//! Shared state handed to every request handler.

use std::sync::Arc;
use std::time::Duration;

use crate::ai::AiClient;
use crate::auth::oauth::{MemoryNonceStore, NonceStore};
use crate::auth::{SessionStore, VerificationStrategy};
use crate::config::AppConfig;

/// Timeout applied to all outbound provider calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// OAuth CSRF nonce authority.
    pub nonces: Arc<dyn NonceStore>,
    /// Per-shop sessions.
    pub sessions: Arc<SessionStore>,
    /// AI insight client.
    pub ai: Arc<AiClient>,
    /// Outbound HTTP client, shared across handlers.
    pub http: reqwest::Client,
    /// How resolved credentials are validated.
    pub verification: VerificationStrategy,
}

impl AppState {
    /// Builds state from configuration, wiring the default in-process stores.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        let ai = AiClient::new(http.clone(), config.openai_api_key().map(str::to_string));

        Self {
            config: Arc::new(config),
            nonces: Arc::new(MemoryNonceStore::new()),
            sessions: Arc::new(SessionStore::new()),
            ai: Arc::new(ai),
            http,
            verification: VerificationStrategy::default(),
        }
    }

    /// Replaces the AI client (tests point it at a mock server).
    #[must_use]
    pub fn with_ai(mut self, ai: AiClient) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Selects how resolved credentials are validated.
    #[must_use]
    pub fn with_verification(mut self, verification: VerificationStrategy) -> Self {
        self.verification = verification;
        self
    }
}
