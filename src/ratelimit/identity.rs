//! Client identity derivation for rate limiting.

use axum::http::{HeaderMap, HeaderName};

use crate::error::{FolioError, Result};

/// The key a client's requests are counted under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used in the rate limit store.
    pub fn store_key(&self) -> String {
        format!("rate-limit:{}", self.0)
    }
}

impl std::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives a [`ClientIdentity`] from request headers.
///
/// The identity is the first entry of the forwarded-address header. Every
/// request without that header shares the fallback identity, and with it a
/// single quota.
#[derive(Debug, Clone)]
pub struct IdentityExtractor {
    header: HeaderName,
    fallback: ClientIdentity,
}

impl IdentityExtractor {
    pub fn new(header: &str, fallback: &str) -> Result<Self> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| FolioError::Config(format!("invalid identity header {header:?}: {e}")))?;
        Ok(Self {
            header,
            fallback: ClientIdentity::new(fallback),
        })
    }

    pub fn identify(&self, headers: &HeaderMap) -> ClientIdentity {
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ClientIdentity::new)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for IdentityExtractor {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static("x-forwarded-for"),
            fallback: ClientIdentity::new("anonymous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_first_forwarded_address_wins() {
        let extractor = IdentityExtractor::default();
        let identity = extractor.identify(&headers(" 203.0.113.7 , 10.0.0.1, 10.0.0.2"));
        assert_eq!(identity.as_str(), "203.0.113.7");
        assert_eq!(identity.store_key(), "rate-limit:203.0.113.7");
    }

    #[test]
    fn test_missing_header_uses_fallback() {
        let extractor = IdentityExtractor::default();
        let identity = extractor.identify(&HeaderMap::new());
        assert_eq!(identity, ClientIdentity::new("anonymous"));
    }

    #[test]
    fn test_blank_header_uses_fallback() {
        let extractor = IdentityExtractor::default();
        assert_eq!(extractor.identify(&headers("  ")).as_str(), "anonymous");
        assert_eq!(extractor.identify(&headers(", 10.0.0.1")).as_str(), "anonymous");
    }

    #[test]
    fn test_custom_header_and_fallback() {
        let extractor = IdentityExtractor::new("x-real-ip", "unknown").unwrap();
        let mut map = HeaderMap::new();
        map.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(extractor.identify(&map).as_str(), "198.51.100.4");

        // The default header is ignored once another is configured
        assert_eq!(extractor.identify(&headers("203.0.113.7")).as_str(), "unknown");
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let err = IdentityExtractor::new("bad header", "anonymous").unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }
}
