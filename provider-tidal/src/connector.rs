//! Tidal API connector.
//!
//! Search goes through the public catalog API; playlist mutations go
//! through the desktop playlist endpoints with ETag-based conditional
//! writes.

use async_trait::async_trait;
use catalog_traits::{
    CatalogError, ConcurrencyToken, PlaylistSnapshot, Result, TargetCatalog, TargetTrack,
};
use core_auth::AccessTokenSource;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::types::{CreatePlaylistResponse, PlaylistItemsResponse, SearchResponse};

/// Catalog search API base URL
const SEARCH_API_BASE: &str = "https://api.tidal.com/v2";

/// Playlist API base URL (desktop endpoints)
const PLAYLIST_API_BASE: &str = "https://desktop.tidal.com/v1";

const SERVICE: &str = "Tidal";

/// Read-write Tidal client.
pub struct TidalConnector {
    http: reqwest::Client,
    tokens: Arc<dyn AccessTokenSource>,
    search_base: String,
    playlist_base: String,
}

impl TidalConnector {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            http,
            tokens,
            search_base: SEARCH_API_BASE.to_string(),
            playlist_base: PLAYLIST_API_BASE.to_string(),
        }
    }

    async fn bearer(&self) -> Result<String> {
        self.tokens
            .access_token()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))
    }

    async fn api_error(service_response: reqwest::Response) -> CatalogError {
        let status = service_response.status().as_u16();
        let message = service_response.text().await.unwrap_or_default();
        CatalogError::Api {
            service: SERVICE,
            status,
            message,
        }
    }

    fn etag_of(response: &reqwest::Response) -> Option<ConcurrencyToken> {
        response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(ConcurrencyToken::new)
    }
}

#[async_trait]
impl TargetCatalog for TidalConnector {
    #[instrument(skip(self), fields(query = %query))]
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<TargetTrack>> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(format!("{}/search/", self.search_base))
            .query(&[
                ("query", query),
                ("limit", &limit.to_string()),
                ("types", "TRACKS"),
                ("includeContributors", "true"),
                ("supportsUserData", "true"),
            ])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "Tidal search failed");
            return Err(Self::api_error(response).await);
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        let tracks = body
            .tracks
            .items
            .into_iter()
            .map(|t| TargetTrack {
                id: t.id.to_string(),
                title: t.title,
                artists: t.artists.into_iter().map(|a| a.name).collect(),
            })
            .collect::<Vec<_>>();

        debug!(count = tracks.len(), "Search returned ranked tracks");
        Ok(tracks)
    }

    #[instrument(skip(self))]
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String> {
        let token = self.bearer().await?;

        let response = self
            .http
            .post(format!("{}/playlists", self.playlist_base))
            .bearer_auth(token)
            .form(&[("name", name), ("description", description)])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                "Failed to create Tidal playlist"
            );
            return Err(Self::api_error(response).await);
        }

        let body: CreatePlaylistResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        debug!(playlist_id = %body.uuid, "Created Tidal playlist");
        Ok(body.uuid)
    }

    #[instrument(skip(self), fields(playlist_id = %playlist_id))]
    async fn playlist_snapshot(&self, playlist_id: &str) -> Result<PlaylistSnapshot> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(format!(
                "{}/playlists/{}/items",
                self.playlist_base, playlist_id
            ))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("playlist {playlist_id}")));
        }
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        let Some(token) = Self::etag_of(&response) else {
            warn!("ETag header missing from playlist items response");
            return Err(CatalogError::NotFound(format!(
                "concurrency token for playlist {playlist_id}"
            )));
        };

        let body: PlaylistItemsResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        Ok(PlaylistSnapshot {
            item_ids: body.items.into_iter().map(|i| i.item.id.to_string()).collect(),
            token,
        })
    }

    #[instrument(skip(self, token), fields(playlist_id = %playlist_id, track_id = %track_id))]
    async fn insert_item(
        &self,
        playlist_id: &str,
        track_id: &str,
        position: usize,
        token: &ConcurrencyToken,
    ) -> Result<Option<ConcurrencyToken>> {
        let bearer = self.bearer().await?;

        let response = self
            .http
            .post(format!(
                "{}/playlists/{}/items",
                self.playlist_base, playlist_id
            ))
            .bearer_auth(bearer)
            .header("If-None-Match", token.as_str())
            .form(&[
                ("onArtifactNotFound", "FAIL"),
                ("onDupes", "FAIL"),
                ("trackIds", track_id),
                ("toIndex", &position.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::PRECONDITION_FAILED {
            warn!("Conditional insert rejected, concurrency token is stale");
            return Err(CatalogError::Conflict {
                playlist_id: playlist_id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(Self::etag_of(&response))
    }

    #[instrument(skip(self), fields(playlist_id = %playlist_id, index = index))]
    async fn delete_item(&self, playlist_id: &str, index: usize) -> Result<()> {
        let token = self.bearer().await?;

        let response = self
            .http
            .delete(format!(
                "{}/playlists/{}/items/{}",
                self.playlist_base, playlist_id, index
            ))
            .query(&[("order", "INDEX"), ("orderDirection", "ASC")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            warn!(
                status = response.status().as_u16(),
                "Failed to delete playlist item"
            );
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{PlaylistItemsResponse, SearchResponse};

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "tracks": {
                "items": [
                    {"id": 1001, "title": "Song1", "artists": [{"name": "ArtistA"}, {"name": "ArtistB"}]},
                    {"id": 1002, "title": "Song2", "artists": []}
                ]
            }
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.tracks.items.len(), 2);
        assert_eq!(body.tracks.items[0].id, 1001);
        assert_eq!(body.tracks.items[0].artists[1].name, "ArtistB");
    }

    #[test]
    fn test_parse_playlist_items() {
        let json = r#"{
            "items": [
                {"item": {"id": 11}},
                {"item": {"id": 22}}
            ]
        }"#;

        let body: PlaylistItemsResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<u64> = body.items.iter().map(|i| i.item.id).collect();
        assert_eq!(ids, vec![11, 22]);
    }
}
