use serde::{Deserialize, Serialize};
use std::fmt;

/// An access/refresh token pair for the source service.
///
/// Expiry is tracked as a Unix timestamp so the pair can be persisted and
/// reloaded across process restarts.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: i64,
}

impl SessionTokens {
    /// Create tokens expiring `expires_in` seconds from now.
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        }
    }

    /// Reconstruct tokens from persisted parts.
    pub fn from_parts(
        access_token: String,
        refresh_token: Option<String>,
        expires_at: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_with_buffer(0)
    }

    /// Whether the access token expires within `buffer_seconds` from now.
    pub fn is_expired_with_buffer(&self, buffer_seconds: i64) -> bool {
        chrono::Utc::now().timestamp() + buffer_seconds >= self.expires_at
    }
}

// Token values must never leak into logs.
impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tokens_not_expired() {
        let tokens = SessionTokens::new("access".to_string(), None, 3600);
        assert!(!tokens.is_expired());
        assert!(!tokens.is_expired_with_buffer(60));
    }

    #[test]
    fn test_buffer_expiry() {
        let tokens = SessionTokens::new("access".to_string(), None, 30);
        assert!(!tokens.is_expired());
        assert!(tokens.is_expired_with_buffer(60));
    }

    #[test]
    fn test_past_expiry() {
        let tokens = SessionTokens::from_parts("access".to_string(), None, 0);
        assert!(tokens.is_expired());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let tokens = SessionTokens::new("very-secret".to_string(), None, 3600);
        let rendered = format!("{:?}", tokens);
        assert!(!rendered.contains("very-secret"));
    }
}
