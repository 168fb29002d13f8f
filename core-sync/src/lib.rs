//! # Sync Engine
//!
//! One-way mirroring of source-service playlists onto the target service.
//!
//! ## Components
//!
//! - **Track Resolver** (`resolver`): fuzzy-matches source tracks against
//!   the target catalog's search
//! - **Edit Plans** (`diff`): pure diff of a live playlist against the
//!   desired sequence, as positional inserts and deletes
//! - **Engine** (`engine`): single-flight orchestrator running one cycle
//!   per active playlist link, with optimistic-concurrency writes
//! - **Reporting** (`report`): engine state plus per-cycle outcomes

pub mod diff;
pub mod engine;
pub mod error;
pub mod report;
pub mod resolver;

pub use diff::{edit_plan, Edit};
pub use engine::{SyncConfig, SyncEngine};
pub use error::{Result, SyncError};
pub use report::{CycleOutcome, CycleStatus, EngineState, SyncReport};
pub use resolver::TrackResolver;
