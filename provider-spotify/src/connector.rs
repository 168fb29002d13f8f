//! Spotify Web API connector.
//!
//! Implements the `SourceCatalog` trait over the two read endpoints the
//! engine needs: the current user's playlists and a playlist's tracks.

use async_trait::async_trait;
use catalog_traits::{CatalogError, Result, SourceCatalog, SourcePlaylist, SourceTrack};
use core_auth::AccessTokenSource;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::types::{PlaylistsPage, TracksPage};

/// Spotify Web API base URL
const API_BASE: &str = "https://api.spotify.com/v1";

const SERVICE: &str = "Spotify";

/// Read-only Spotify client.
pub struct SpotifyConnector {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenSource>,
    base_url: String,
}

impl SpotifyConnector {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            http,
            tokens,
            base_url: API_BASE.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Spotify API request failed");
            return Err(CatalogError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SourceCatalog for SpotifyConnector {
    #[instrument(skip(self))]
    async fn playlists(&self) -> Result<Vec<SourcePlaylist>> {
        let page: PlaylistsPage = self
            .get_json(format!("{}/me/playlists", self.base_url))
            .await?;

        let playlists = page
            .items
            .into_iter()
            .map(|p| SourcePlaylist {
                id: p.id,
                name: p.name,
                description: p.description.unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        debug!(count = playlists.len(), "Fetched playlists from Spotify");
        Ok(playlists)
    }

    #[instrument(skip(self), fields(playlist_id = %playlist_id))]
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<SourceTrack>> {
        let page: TracksPage = self
            .get_json(format!("{}/playlists/{}/tracks", self.base_url, playlist_id))
            .await?;

        let mut tracks = Vec::with_capacity(page.items.len());
        for item in page.items {
            let Some(track) = item.track else {
                // Entry no longer available in the catalog
                continue;
            };
            let Some(id) = track.id else {
                debug!(title = %track.name, "Skipping track without id");
                continue;
            };
            tracks.push(SourceTrack {
                id,
                title: track.name,
                artists: track.artists.into_iter().map(|a| a.name).collect(),
            });
        }

        debug!(count = tracks.len(), "Fetched playlist tracks from Spotify");
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{PlaylistsPage, TracksPage};

    #[test]
    fn test_parse_playlists_page() {
        let json = r#"{
            "items": [
                {"id": "pl1", "name": "Roadtrip", "description": "summer"},
                {"id": "pl2", "name": "Focus", "description": null}
            ]
        }"#;

        let page: PlaylistsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "pl1");
        assert!(page.items[1].description.is_none());
    }

    #[test]
    fn test_parse_tracks_page_with_unavailable_entry() {
        let json = r#"{
            "items": [
                {"track": {"id": "t1", "name": "Song1", "artists": [{"name": "ArtistA"}]}},
                {"track": null},
                {"track": {"id": null, "name": "Local file", "artists": []}}
            ]
        }"#;

        let page: TracksPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.items[1].track.is_none());
        assert!(page.items[2].track.as_ref().unwrap().id.is_none());
    }
}
