//! Validated newtype wrappers for configuration values.
//!
//! Raw strings are rejected at construction time so that the rest of the
//! crate can assume credentials and domains are well formed.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify API key (the OAuth client identifier).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key (the OAuth client secret and HMAC key).
///
/// The `Debug` implementation masks the value so the secret cannot leak into
/// logs or error output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiSecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// A validated shop domain.
///
/// Every tenant is identified by a full `*.myshopify.com` domain. Unlike a
/// permissive normalizer, this type requires the suffix to be present:
/// a bare shop name arriving in a query parameter is a client error, not
/// something to silently repair.
///
/// ```rust
/// use shoppulse::ShopDomain;
///
/// let shop = ShopDomain::new("test.myshopify.com").unwrap();
/// assert_eq!(shop.shop_name(), "test");
/// assert!(ShopDomain::new("test").is_err());
/// assert!(ShopDomain::new("evil.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// The tenant domain suffix required by the identity provider.
    pub const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain does not end
    /// in `.myshopify.com` or the shop name contains invalid characters.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().to_lowercase();

        let Some(shop_name) = domain.strip_suffix(Self::SUFFIX) else {
            return Err(ConfigError::InvalidShopDomain { domain });
        };

        if !Self::is_valid_shop_name(shop_name) {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        Ok(Self(domain))
    }

    /// Returns the shop name portion of the domain.
    ///
    /// For `my-store.myshopify.com`, this returns `my-store`.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.0[..self.0.len() - Self::SUFFIX.len()]
    }

    fn is_valid_shop_name(name: &str) -> bool {
        if name.is_empty() || name.starts_with('-') || name.ends_with('-') {
            return false;
        }
        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated public base URL for the application.
///
/// Used to build the OAuth redirect URI and webhook callback addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl(String);

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// The URL must carry a scheme and a non-empty host, and any trailing
    /// slash is stripped so paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL is malformed.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();

        let Some(scheme_end) = url.find("://") else {
            return Err(ConfigError::InvalidHostUrl { url });
        };

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        let host = &url[scheme_end + 3..];
        if host.is_empty() || host.starts_with([':', '/', '?', '#']) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        Ok(Self(url))
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
