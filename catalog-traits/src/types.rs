use serde::{Deserialize, Serialize};
use std::fmt;

/// A playlist as reported by the source service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePlaylist {
    /// Opaque source-service identifier
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A track as reported by the source service. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTrack {
    /// Opaque source-service identifier
    pub id: String,
    pub title: String,
    /// Ordered list of contributing artist names
    pub artists: Vec<String>,
}

/// A ranked search hit from the target catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTrack {
    /// Opaque target-service identifier
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
}

/// Opaque version marker required on conditional writes against the
/// target service. A stale token causes the write to be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyToken(String);

impl ConcurrencyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The observed state of a target playlist: its current item order plus
/// the concurrency token that guards writes against it.
#[derive(Debug, Clone)]
pub struct PlaylistSnapshot {
    /// Target track IDs in their current playlist order
    pub item_ids: Vec<String>,
    pub token: ConcurrencyToken,
}
