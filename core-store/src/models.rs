use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Local identity of a resolved track, independent of either service's
/// identifier scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalTrackId(Uuid);

impl LocalTrackId {
    /// Create a new random track identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LocalTrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalTrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source track matched to a target-service identifier.
///
/// Created once per unique `source_id` and persisted indefinitely; never
/// mutated after creation. Re-resolution only ever creates a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub id: LocalTrackId,
    pub title: String,
    /// Display string of the matched track's artists
    pub artist: String,
    /// Source-service identifier; globally unique across the track pool
    pub source_id: String,
    /// Target-service identifier the track resolved to
    pub target_id: String,
}

/// The 1:1 link between a source playlist and its mirrored target playlist.
///
/// `track_sequence` is the last known *applied* state of the target
/// playlist, not a live read. It is the baseline the orchestrator diffs
/// against and is replaced only after a fully successful sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistLink {
    pub name: String,
    pub source_id: String,
    pub target_id: String,
    pub track_sequence: Vec<LocalTrackId>,
}
