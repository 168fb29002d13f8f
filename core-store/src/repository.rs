//! Repository traits and SQLite implementations for the identity map.
//!
//! Contract invariants:
//! - `add_track` / `add_playlist` never overwrite an existing record
//! - only `update_playlist` mutates an existing link, and it fails with
//!   `StoreError::NotFound` when no record matches the source id
//! - all reads return owned values; callers never observe in-place mutation

use crate::error::{Result, StoreError};
use crate::models::{LocalTrackId, PlaylistLink, ResolvedTrack};
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

// ============================================================================
// Traits
// ============================================================================

/// Global pool of resolved tracks, deduplicated by source id.
#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// All resolved tracks.
    async fn get_tracks(&self) -> Result<Vec<ResolvedTrack>>;

    /// Look up a resolved track by its source-service id.
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<ResolvedTrack>>;

    /// Persist a resolved track. A record with the same source id already
    /// present is left untouched.
    async fn add_track(&self, track: &ResolvedTrack) -> Result<()>;
}

/// Playlist links and their believed target state.
#[async_trait]
pub trait PlaylistLinkRepository: Send + Sync {
    /// All playlist links, track sequences included.
    async fn get_playlists(&self) -> Result<Vec<PlaylistLink>>;

    /// Look up a link by its source playlist id.
    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<PlaylistLink>>;

    /// Persist a new link. An existing link with the same source id is left
    /// untouched.
    async fn add_playlist(&self, link: &PlaylistLink) -> Result<()>;

    /// Replace the link matching `link.source_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no existing record matches.
    async fn update_playlist(&self, link: &PlaylistLink) -> Result<()>;
}

/// The set of target playlists currently selected for synchronization.
///
/// Kept separate from the links themselves: deselecting a playlist only
/// excludes it from future cycles.
#[async_trait]
pub trait SelectionRepository: Send + Sync {
    /// Target playlist ids marked active.
    async fn active_playlists(&self) -> Result<Vec<String>>;

    /// Replace the active set.
    async fn set_active(&self, target_ids: &[String]) -> Result<()>;

    async fn is_active(&self, target_id: &str) -> Result<bool>;
}

// ============================================================================
// SQLite implementations
// ============================================================================

#[derive(Debug, FromRow)]
struct TrackRow {
    id: String,
    title: String,
    artist: String,
    source_id: String,
    target_id: String,
}

impl TryFrom<TrackRow> for ResolvedTrack {
    type Error = StoreError;

    fn try_from(row: TrackRow) -> Result<Self> {
        let id = LocalTrackId::from_string(&row.id)
            .map_err(|e| StoreError::InvalidValue(format!("track id {}: {}", row.id, e)))?;
        Ok(ResolvedTrack {
            id,
            title: row.title,
            artist: row.artist,
            source_id: row.source_id,
            target_id: row.target_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct LinkRow {
    source_id: String,
    target_id: String,
    name: String,
}

/// SQLite implementation of [`TrackRepository`].
pub struct SqliteTrackRepository {
    pool: SqlitePool,
}

impl SqliteTrackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackRepository for SqliteTrackRepository {
    async fn get_tracks(&self) -> Result<Vec<ResolvedTrack>> {
        let rows = sqlx::query_as::<_, TrackRow>(
            "SELECT id, title, artist, source_id, target_id FROM tracks ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ResolvedTrack::try_from).collect()
    }

    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<ResolvedTrack>> {
        let row = sqlx::query_as::<_, TrackRow>(
            "SELECT id, title, artist, source_id, target_id FROM tracks WHERE source_id = ?",
        )
        .bind(source_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResolvedTrack::try_from).transpose()
    }

    async fn add_track(&self, track: &ResolvedTrack) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO tracks (id, title, artist, source_id, target_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(track.id.to_string())
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.source_id)
        .bind(&track.target_id)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(source_id = %track.source_id, "Track already resolved, keeping existing record");
        }

        Ok(())
    }
}

/// SQLite implementation of [`PlaylistLinkRepository`].
pub struct SqlitePlaylistLinkRepository {
    pool: SqlitePool,
}

impl SqlitePlaylistLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_sequence(&self, source_id: &str) -> Result<Vec<LocalTrackId>> {
        let ids: Vec<(String,)> = sqlx::query_as(
            "SELECT track_id FROM link_tracks WHERE link_source_id = ? ORDER BY position",
        )
        .bind(source_id)
        .fetch_all(&self.pool)
        .await?;

        ids.into_iter()
            .map(|(id,)| {
                LocalTrackId::from_string(&id)
                    .map_err(|e| StoreError::InvalidValue(format!("track id {}: {}", id, e)))
            })
            .collect()
    }
}

#[async_trait]
impl PlaylistLinkRepository for SqlitePlaylistLinkRepository {
    async fn get_playlists(&self) -> Result<Vec<PlaylistLink>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            "SELECT source_id, target_id, name FROM playlist_links ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut links = Vec::with_capacity(rows.len());
        for row in rows {
            let track_sequence = self.load_sequence(&row.source_id).await?;
            links.push(PlaylistLink {
                name: row.name,
                source_id: row.source_id,
                target_id: row.target_id,
                track_sequence,
            });
        }

        Ok(links)
    }

    async fn find_by_source_id(&self, source_id: &str) -> Result<Option<PlaylistLink>> {
        let row = sqlx::query_as::<_, LinkRow>(
            "SELECT source_id, target_id, name FROM playlist_links WHERE source_id = ?",
        )
        .bind(source_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let track_sequence = self.load_sequence(&row.source_id).await?;
        Ok(Some(PlaylistLink {
            name: row.name,
            source_id: row.source_id,
            target_id: row.target_id,
            track_sequence,
        }))
    }

    async fn add_playlist(&self, link: &PlaylistLink) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO playlist_links (source_id, target_id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.source_id)
        .bind(&link.target_id)
        .bind(&link.name)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            debug!(source_id = %link.source_id, "Playlist link already exists, keeping existing record");
            return Ok(());
        }

        for (position, track_id) in link.track_sequence.iter().enumerate() {
            sqlx::query(
                "INSERT INTO link_tracks (link_source_id, position, track_id) VALUES (?, ?, ?)",
            )
            .bind(&link.source_id)
            .bind(position as i64)
            .bind(track_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_playlist(&self, link: &PlaylistLink) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE playlist_links SET target_id = ?, name = ?, updated_at = ?
            WHERE source_id = ?
            "#,
        )
        .bind(&link.target_id)
        .bind(&link.name)
        .bind(chrono::Utc::now().timestamp())
        .bind(&link.source_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "playlist link",
                source_id: link.source_id.clone(),
            });
        }

        sqlx::query("DELETE FROM link_tracks WHERE link_source_id = ?")
            .bind(&link.source_id)
            .execute(&mut *tx)
            .await?;

        for (position, track_id) in link.track_sequence.iter().enumerate() {
            sqlx::query(
                "INSERT INTO link_tracks (link_source_id, position, track_id) VALUES (?, ?, ?)",
            )
            .bind(&link.source_id)
            .bind(position as i64)
            .bind(track_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// SQLite implementation of [`SelectionRepository`].
pub struct SqliteSelectionRepository {
    pool: SqlitePool,
}

impl SqliteSelectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SelectionRepository for SqliteSelectionRepository {
    async fn active_playlists(&self) -> Result<Vec<String>> {
        let ids: Vec<(String,)> =
            sqlx::query_as("SELECT target_id FROM sync_selection ORDER BY target_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn set_active(&self, target_ids: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sync_selection")
            .execute(&mut *tx)
            .await?;

        for target_id in target_ids {
            sqlx::query("INSERT OR IGNORE INTO sync_selection (target_id) VALUES (?)")
                .bind(target_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn is_active(&self, target_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sync_selection WHERE target_id = ?")
                .bind(target_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    fn track(source_id: &str, target_id: &str) -> ResolvedTrack {
        ResolvedTrack {
            id: LocalTrackId::new(),
            title: format!("Title {source_id}"),
            artist: "Artist".to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_get_tracks() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteTrackRepository::new(pool);

        let t1 = track("sp1", "td1");
        let t2 = track("sp2", "td2");
        repo.add_track(&t1).await.unwrap();
        repo.add_track(&t2).await.unwrap();

        let all = repo.get_tracks().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&t1));
        assert!(all.contains(&t2));

        let found = repo.find_by_source_id("sp2").await.unwrap().unwrap();
        assert_eq!(found.target_id, "td2");
    }

    #[tokio::test]
    async fn test_add_track_never_overwrites() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqliteTrackRepository::new(pool);

        let original = track("sp1", "td1");
        repo.add_track(&original).await.unwrap();

        // Second resolution of the same source id must not replace the record.
        let duplicate = track("sp1", "td-other");
        repo.add_track(&duplicate).await.unwrap();

        let all = repo.get_tracks().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].target_id, "td1");
    }

    #[tokio::test]
    async fn test_add_and_find_playlist() {
        let pool = create_test_pool().await.unwrap();
        let tracks = SqliteTrackRepository::new(pool.clone());
        let links = SqlitePlaylistLinkRepository::new(pool);

        let t1 = track("sp1", "td1");
        let t2 = track("sp2", "td2");
        tracks.add_track(&t1).await.unwrap();
        tracks.add_track(&t2).await.unwrap();

        let link = PlaylistLink {
            name: "Roadtrip".to_string(),
            source_id: "src-pl".to_string(),
            target_id: "tgt-pl".to_string(),
            track_sequence: vec![t1.id, t2.id],
        };
        links.add_playlist(&link).await.unwrap();

        let found = links.find_by_source_id("src-pl").await.unwrap().unwrap();
        assert_eq!(found, link);

        assert!(links.find_by_source_id("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_playlist_never_overwrites() {
        let pool = create_test_pool().await.unwrap();
        let links = SqlitePlaylistLinkRepository::new(pool);

        let link = PlaylistLink {
            name: "First".to_string(),
            source_id: "src-pl".to_string(),
            target_id: "tgt-pl".to_string(),
            track_sequence: vec![],
        };
        links.add_playlist(&link).await.unwrap();

        let clash = PlaylistLink {
            name: "Second".to_string(),
            ..link.clone()
        };
        links.add_playlist(&clash).await.unwrap();

        let found = links.find_by_source_id("src-pl").await.unwrap().unwrap();
        assert_eq!(found.name, "First");
    }

    #[tokio::test]
    async fn test_update_playlist_replaces_sequence() {
        let pool = create_test_pool().await.unwrap();
        let tracks = SqliteTrackRepository::new(pool.clone());
        let links = SqlitePlaylistLinkRepository::new(pool);

        let t1 = track("sp1", "td1");
        let t2 = track("sp2", "td2");
        let t3 = track("sp3", "td3");
        for t in [&t1, &t2, &t3] {
            tracks.add_track(t).await.unwrap();
        }

        let mut link = PlaylistLink {
            name: "Roadtrip".to_string(),
            source_id: "src-pl".to_string(),
            target_id: "tgt-pl".to_string(),
            track_sequence: vec![t1.id, t2.id, t3.id],
        };
        links.add_playlist(&link).await.unwrap();

        link.track_sequence = vec![t1.id, t3.id];
        links.update_playlist(&link).await.unwrap();

        let found = links.find_by_source_id("src-pl").await.unwrap().unwrap();
        assert_eq!(found.track_sequence, vec![t1.id, t3.id]);
    }

    #[tokio::test]
    async fn test_update_missing_playlist_is_not_found() {
        let pool = create_test_pool().await.unwrap();
        let links = SqlitePlaylistLinkRepository::new(pool);

        let link = PlaylistLink {
            name: "Ghost".to_string(),
            source_id: "absent".to_string(),
            target_id: "tgt".to_string(),
            track_sequence: vec![],
        };

        assert!(matches!(
            links.update_playlist(&link).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_selection_replace_set() {
        let pool = create_test_pool().await.unwrap();
        let selection = SqliteSelectionRepository::new(pool);

        selection
            .set_active(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert!(selection.is_active("a").await.unwrap());
        assert!(selection.is_active("b").await.unwrap());

        // Deselecting replaces the whole set; links are untouched elsewhere.
        selection.set_active(&["b".to_string()]).await.unwrap();
        assert!(!selection.is_active("a").await.unwrap());
        assert_eq!(selection.active_playlists().await.unwrap(), vec!["b"]);
    }
}
