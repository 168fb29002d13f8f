//! # Credential Store
//!
//! Holds and refreshes the access tokens for the source streaming service.
//!
//! ## Overview
//!
//! This crate provides:
//! - `SessionTokens`: access/refresh token pair with expiry tracking
//! - `OAuthClient`: authorization-code exchange and refresh against the
//!   service's OAuth token endpoint
//! - `SecretStore`: async persistence trait for serialized tokens, with a
//!   JSON-file implementation (`FileSecretStore`)
//! - `CredentialStore`: the in-process token holder used by every network
//!   client, refreshing through `OAuthClient` when the expiry buffer is hit
//!
//! Token values are never logged.

pub mod credentials;
pub mod error;
pub mod oauth;
pub mod store;
pub mod types;

pub use credentials::{AccessTokenSource, CredentialStore, StaticTokenSource};
pub use error::{AuthError, Result};
pub use oauth::{OAuthClient, OAuthConfig};
pub use store::{FileSecretStore, SecretStore};
pub use types::SessionTokens;
