//! OAuth 2.0 token endpoint client.
//!
//! Implements the two grants the engine needs against the source service:
//! authorization-code exchange (login) and refresh-token rotation. Both use
//! HTTP basic auth with the client credentials, form-encoded bodies, and
//! `{access_token, refresh_token?, expires_in}` JSON responses.

use crate::error::{AuthError, Result};
use crate::types::SessionTokens;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// OAuth configuration for the source service.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered for the authorization-code flow. The local
    /// redirect server that captures the code is outside this crate.
    pub redirect_uri: String,
    /// Token endpoint URL
    pub token_url: String,
}

/// Default expiry when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN: i64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// Client for the OAuth token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Exchange an authorization code for session tokens.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<SessionTokens> {
        debug!("Exchanging authorization code for tokens");
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.token_request(&params).await
    }

    /// Obtain a fresh access token using a refresh token.
    ///
    /// The endpoint may omit the refresh token from the response, in which
    /// case the caller keeps using the old one.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens> {
        debug!("Refreshing access token");
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        self.token_request(&params).await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<SessionTokens> {
        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Token endpoint rejected request");
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        Ok(SessionTokens::new(
            body.access_token,
            body.refresh_token,
            body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        ))
    }
}
