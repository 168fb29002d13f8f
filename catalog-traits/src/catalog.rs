use crate::error::Result;
use crate::types::{ConcurrencyToken, PlaylistSnapshot, SourcePlaylist, SourceTrack, TargetTrack};
use async_trait::async_trait;

/// Read-only client for the service being mirrored from.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// List the current user's playlists.
    async fn playlists(&self) -> Result<Vec<SourcePlaylist>>;

    /// List the tracks of a playlist, in playlist order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the playlist no longer exists.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<SourceTrack>>;
}

/// Client for the service being mirrored to.
///
/// Item mutations use optimistic concurrency: writes are conditional on the
/// token from the most recent [`playlist_snapshot`](TargetCatalog::playlist_snapshot)
/// or the refreshed token returned by a successful insert.
#[async_trait]
pub trait TargetCatalog: Send + Sync {
    /// Search the catalog for tracks, ranked by the service's own relevance.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TargetTrack>>;

    /// Create an empty playlist and return its identifier.
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String>;

    /// Fetch the playlist's current item list together with the concurrency
    /// token guarding it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the playlist does not exist or
    /// the service did not supply a token.
    async fn playlist_snapshot(&self, playlist_id: &str) -> Result<PlaylistSnapshot>;

    /// Insert a track at `position`, conditional on `token`.
    ///
    /// On success the response may carry a refreshed token, which must be
    /// used for the next conditional write in the same cycle.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if the stored token changed since it
    /// was fetched. Callers must abort the current edit sequence rather than
    /// retry.
    async fn insert_item(
        &self,
        playlist_id: &str,
        track_id: &str,
        position: usize,
        token: &ConcurrencyToken,
    ) -> Result<Option<ConcurrencyToken>>;

    /// Delete the item at a zero-based position. Deletions shift every
    /// subsequent item down by one.
    async fn delete_item(&self, playlist_id: &str, index: usize) -> Result<()>;
}
