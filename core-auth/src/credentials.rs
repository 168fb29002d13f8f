//! In-process credential holder.
//!
//! `CredentialStore` keeps the current session tokens behind an async lock,
//! persists them through a [`SecretStore`], and refreshes them through the
//! [`OAuthClient`] when the expiry buffer is hit. Concurrent refreshes from
//! independent callers are serialized only by the lock itself; there is no
//! further coordination (accepted limitation of the single-user design).

use crate::error::{AuthError, Result};
use crate::oauth::OAuthClient;
use crate::store::SecretStore;
use crate::types::SessionTokens;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Storage key for the persisted session.
const SESSION_KEY: &str = "session_tokens";

/// Refresh when the access token expires within this window.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Anything that can produce a bearer token for an API request.
///
/// Catalog clients take this instead of a raw string so that tokens rotated
/// mid-run are picked up by the next request.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token, for services whose credentials are managed by the host
/// process rather than this engine.
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Holds and refreshes the source-service session.
pub struct CredentialStore {
    oauth: OAuthClient,
    store: Arc<dyn SecretStore>,
    tokens: RwLock<Option<SessionTokens>>,
}

impl CredentialStore {
    pub fn new(oauth: OAuthClient, store: Arc<dyn SecretStore>) -> Self {
        Self {
            oauth,
            store,
            tokens: RwLock::new(None),
        }
    }

    /// Load a persisted session, if any. Corrupted data is discarded.
    pub async fn load(&self) -> Result<()> {
        let Some(bytes) = self.store.get(SESSION_KEY).await? else {
            debug!("No persisted session");
            return Ok(());
        };

        match serde_json::from_slice::<SessionTokens>(&bytes) {
            Ok(tokens) => {
                info!("Restored persisted session");
                *self.tokens.write().await = Some(tokens);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Persisted session is corrupted, discarding");
                self.store.delete(SESSION_KEY).await?;
                Ok(())
            }
        }
    }

    /// Exchange an authorization code and start a session.
    #[instrument(skip(self, code))]
    pub async fn login(&self, code: &str) -> Result<()> {
        let tokens = self.oauth.exchange_code(code).await?;
        self.persist(&tokens).await?;
        *self.tokens.write().await = Some(tokens);
        info!("Logged in");
        Ok(())
    }

    /// Start a session from already-obtained tokens.
    pub async fn login_with_tokens(&self, tokens: SessionTokens) -> Result<()> {
        self.persist(&tokens).await?;
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    /// End the session and erase persisted tokens.
    pub async fn logout(&self) -> Result<()> {
        *self.tokens.write().await = None;
        self.store.delete(SESSION_KEY).await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Current access token without refreshing.
    pub async fn access_token(&self) -> Result<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token().to_string())
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Return a non-expired access token, refreshing through the OAuth
    /// endpoint if the current one expires within the buffer window.
    #[instrument(skip(self))]
    pub async fn ensure_fresh(&self) -> Result<String> {
        {
            let guard = self.tokens.read().await;
            match guard.as_ref() {
                None => return Err(AuthError::NotAuthenticated),
                Some(t) if !t.is_expired_with_buffer(EXPIRY_BUFFER_SECS) => {
                    return Ok(t.access_token().to_string());
                }
                Some(_) => {}
            }
        }

        let mut guard = self.tokens.write().await;
        let current = guard.as_ref().ok_or(AuthError::NotAuthenticated)?;

        // Re-check under the write lock: another caller may have refreshed.
        if !current.is_expired_with_buffer(EXPIRY_BUFFER_SECS) {
            return Ok(current.access_token().to_string());
        }

        let refresh_token = current
            .refresh_token()
            .ok_or(AuthError::NoRefreshToken)?
            .to_string();

        let refreshed = self
            .oauth
            .refresh(&refresh_token)
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        // The endpoint may omit the refresh token on rotation; keep the old one.
        let tokens = match refreshed.refresh_token() {
            Some(_) => refreshed,
            None => SessionTokens::from_parts(
                refreshed.access_token().to_string(),
                Some(refresh_token),
                refreshed.expires_at(),
            ),
        };

        self.persist(&tokens).await?;
        let access = tokens.access_token().to_string();
        *guard = Some(tokens);
        info!("Access token refreshed");
        Ok(access)
    }

    async fn persist(&self, tokens: &SessionTokens) -> Result<()> {
        let json =
            serde_json::to_vec(tokens).map_err(|e| AuthError::Serialization(e.to_string()))?;
        self.store.set(SESSION_KEY, &json).await
    }
}

#[async_trait]
impl AccessTokenSource for CredentialStore {
    async fn access_token(&self) -> Result<String> {
        self.ensure_fresh().await
    }
}
