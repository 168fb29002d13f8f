//! Fuzzy resolution of source tracks to target-catalog identities.

use crate::error::{Result, SyncError};
use catalog_traits::{SourceTrack, TargetCatalog};
use core_store::{LocalTrackId, ResolvedTrack};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Matches source tracks against the target catalog's search endpoint.
///
/// The query is the track title followed by every artist name, and the
/// first ranked hit is taken unconditionally. Resolution is stateless;
/// persistence and rate limiting are the caller's concern.
pub struct TrackResolver {
    target: Arc<dyn TargetCatalog>,
    search_limit: u32,
}

impl TrackResolver {
    pub fn new(target: Arc<dyn TargetCatalog>, search_limit: u32) -> Self {
        Self {
            target,
            search_limit,
        }
    }

    /// Resolve a source track to a new [`ResolvedTrack`] identity.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::TrackNotResolved` when the search comes back
    /// empty; catalog failures pass through.
    #[instrument(skip(self, track), fields(title = %track.title))]
    pub async fn resolve(&self, track: &SourceTrack) -> Result<ResolvedTrack> {
        let query = Self::search_query(track);
        let hits = self.target.search_tracks(&query, self.search_limit).await?;

        let Some(hit) = hits.into_iter().next() else {
            return Err(SyncError::TrackNotResolved { query });
        };

        debug!(target_id = %hit.id, matched = %hit.title, "Resolved source track");
        Ok(ResolvedTrack {
            id: LocalTrackId::new(),
            title: hit.title,
            artist: hit.artists.join(", "),
            source_id: track.id.clone(),
            target_id: hit.id,
        })
    }

    fn search_query(track: &SourceTrack) -> String {
        let mut query = track.title.clone();
        for artist in &track.artists {
            query.push(' ');
            query.push_str(artist);
        }
        query.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_traits::{
        ConcurrencyToken, PlaylistSnapshot, Result as CatalogResult, TargetTrack,
    };
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Target {}

        #[async_trait]
        impl TargetCatalog for Target {
            async fn search_tracks(&self, query: &str, limit: u32) -> CatalogResult<Vec<TargetTrack>>;
            async fn create_playlist(&self, name: &str, description: &str) -> CatalogResult<String>;
            async fn playlist_snapshot(&self, playlist_id: &str) -> CatalogResult<PlaylistSnapshot>;
            async fn insert_item(
                &self,
                playlist_id: &str,
                track_id: &str,
                position: usize,
                token: &ConcurrencyToken,
            ) -> CatalogResult<Option<ConcurrencyToken>>;
            async fn delete_item(&self, playlist_id: &str, index: usize) -> CatalogResult<()>;
        }
    }

    fn source_track() -> SourceTrack {
        SourceTrack {
            id: "sp1".to_string(),
            title: "Song1".to_string(),
            artists: vec!["ArtistA".to_string(), "ArtistB".to_string()],
        }
    }

    #[tokio::test]
    async fn test_resolve_takes_first_hit() {
        let mut target = MockTarget::new();
        target
            .expect_search_tracks()
            .with(eq("Song1 ArtistA ArtistB"), eq(20))
            .returning(|_, _| {
                Ok(vec![
                    TargetTrack {
                        id: "t100".to_string(),
                        title: "Song1".to_string(),
                        artists: vec!["ArtistA".to_string(), "ArtistB".to_string()],
                    },
                    TargetTrack {
                        id: "t200".to_string(),
                        title: "Song1 (Live)".to_string(),
                        artists: vec!["ArtistA".to_string()],
                    },
                ])
            });

        let resolver = TrackResolver::new(Arc::new(target), 20);
        let resolved = resolver.resolve(&source_track()).await.unwrap();

        assert_eq!(resolved.target_id, "t100");
        assert_eq!(resolved.source_id, "sp1");
        assert_eq!(resolved.artist, "ArtistA, ArtistB");
    }

    #[tokio::test]
    async fn test_resolve_empty_results_is_not_resolved() {
        let mut target = MockTarget::new();
        target.expect_search_tracks().returning(|_, _| Ok(vec![]));

        let resolver = TrackResolver::new(Arc::new(target), 20);
        let err = resolver.resolve(&source_track()).await.unwrap_err();

        assert!(matches!(err, SyncError::TrackNotResolved { .. }));
    }

    #[tokio::test]
    async fn test_query_without_artists_is_bare_title() {
        let mut target = MockTarget::new();
        target
            .expect_search_tracks()
            .with(eq("Song1"), eq(5))
            .returning(|_, _| {
                Ok(vec![TargetTrack {
                    id: "t1".to_string(),
                    title: "Song1".to_string(),
                    artists: vec![],
                }])
            });

        let resolver = TrackResolver::new(Arc::new(target), 5);
        let track = SourceTrack {
            id: "sp2".to_string(),
            title: "Song1".to_string(),
            artists: vec![],
        };

        let resolved = resolver.resolve(&track).await.unwrap();
        assert_eq!(resolved.artist, "");
    }
}
