//! # Tidal Provider
//!
//! Implements [`TargetCatalog`](catalog_traits::TargetCatalog) against the
//! Tidal desktop API: catalog search plus the playlist-item operations.
//!
//! Playlist writes use the API's optimistic locking: the items `GET`
//! carries an `ETag` response header, inserts send it back as
//! `If-None-Match`, and a stale value is rejected with HTTP 412.

pub mod connector;
pub mod types;

pub use connector::TidalConnector;
