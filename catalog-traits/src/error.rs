use thiserror::Error;

/// Errors shared by both catalog clients.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The requested playlist, track, or header was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A conditional write was rejected because the concurrency token is stale
    #[error("Conditional write rejected for playlist {playlist_id}: concurrency token is stale")]
    Conflict { playlist_id: String },

    /// The remote API returned an error status
    #[error("{service} API error (status {status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// No usable access token was available
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
