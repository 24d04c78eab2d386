//! OAuth 2.0 authorization-code flow.
//!
//! The flow runs in two halves. [`begin_auth`] issues a CSRF nonce and
//! builds the provider authorization URL; [`validate_auth_callback`] checks
//! the returning callback (nonce, signature) and exchanges the code for a
//! [`crate::auth::Session`]. [`signature`] also backs webhook verification,
//! which shares the same HMAC primitives with a different encoding.

mod begin_auth;
mod callback_query;
mod error;
mod nonce;
pub mod signature;
mod validate_callback;

pub use begin_auth::{begin_auth, BeginAuthResult};
pub use callback_query::CallbackQuery;
pub use error::OAuthError;
pub use nonce::{MemoryNonceStore, NonceStore, NONCE_TTL};
pub use validate_callback::validate_auth_callback;
