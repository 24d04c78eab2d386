//! Authentication: OAuth flow, sessions, and per-request resolution.

pub mod oauth;
pub mod resolver;
mod scopes;
mod session;

pub use resolver::{RequestContext, ResolveError, VerificationStrategy};
pub use scopes::AuthScopes;
pub use session::{AccessTokenResponse, Session, SessionStore};
