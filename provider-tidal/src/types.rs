//! Wire types for the Tidal API responses we consume.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<TidalTrack>,
}

/// A track from search results. Tidal ids are numeric.
#[derive(Debug, Deserialize)]
pub struct TidalTrack {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<TidalArtist>,
}

#[derive(Debug, Deserialize)]
pub struct TidalArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistResponse {
    pub uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    pub item: PlaylistItemBody,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemBody {
    pub id: u64,
}
