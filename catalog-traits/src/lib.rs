//! # Catalog Traits
//!
//! Shared contracts between the sync engine and the streaming-service clients.
//!
//! ## Overview
//!
//! This crate defines:
//! - The wire-level data model for both catalogs (`SourcePlaylist`,
//!   `SourceTrack`, `TargetTrack`, `PlaylistSnapshot`)
//! - The `SourceCatalog` trait (read-only catalog being mirrored from)
//! - The `TargetCatalog` trait (read-write catalog being mirrored to,
//!   including the optimistic-concurrency item operations)
//! - The common `CatalogError` taxonomy

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{SourceCatalog, TargetCatalog};
pub use error::{CatalogError, Result};
pub use types::{
    ConcurrencyToken, PlaylistSnapshot, SourcePlaylist, SourceTrack, TargetTrack,
};
