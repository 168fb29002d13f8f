//! # Spotify Provider
//!
//! Implements [`SourceCatalog`](catalog_traits::SourceCatalog) against the
//! Spotify Web API: the read-only side of the mirror.
//!
//! Entries whose track is unavailable (removed from the catalog) are
//! skipped, matching what the playlists endpoint reports for them.

pub mod connector;
pub mod types;

pub use connector::SpotifyConnector;
