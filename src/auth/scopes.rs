//! OAuth permission scope handling.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An ordered, deduplicated list of OAuth permission scopes.
///
/// Parsed from the comma-separated form Shopify uses in both configuration
/// and authorization URLs:
///
/// ```rust
/// use shoppulse::AuthScopes;
///
/// let scopes: AuthScopes = "read_products, write_orders,read_products".parse().unwrap();
/// assert_eq!(scopes.to_string(), "read_products,write_orders");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthScopes(Vec<String>);

impl AuthScopes {
    /// Creates an empty scope list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if no scopes are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the given scope is present.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s == scope)
    }

    /// Iterates over the scopes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = Vec::new();
        for part in s.split(',') {
            let scope = part.trim();
            if scope.is_empty() {
                continue;
            }
            if !scope
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("'{scope}' is not a valid scope name"),
                });
            }
            if !scopes.iter().any(|existing| existing == scope) {
                scopes.push(scope.to_string());
            }
        }
        Ok(Self(scopes))
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}
