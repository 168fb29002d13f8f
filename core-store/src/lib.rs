//! # Identity Store
//!
//! Persisted mapping between source-service and target-service identities:
//! the system of record for what each target playlist is believed to
//! contain.
//!
//! ## Overview
//!
//! - **Models** (`models`): `ResolvedTrack` (one per unique source track,
//!   never mutated after creation) and `PlaylistLink` (source playlist ↔
//!   target playlist plus the last applied track sequence)
//! - **Repositories** (`repository`): trait contracts with SQLite
//!   implementations over `sqlx`
//! - **Database** (`db`): pooled SQLite with embedded migrations and an
//!   in-memory pool for tests

pub mod db;
pub mod error;
pub mod models;
pub mod repository;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{Result, StoreError};
pub use models::{LocalTrackId, PlaylistLink, ResolvedTrack};
pub use repository::{
    PlaylistLinkRepository, SelectionRepository, SqlitePlaylistLinkRepository,
    SqliteSelectionRepository, SqliteTrackRepository, TrackRepository,
};
