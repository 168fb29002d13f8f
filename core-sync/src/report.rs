//! Engine state and per-run reporting types.

use std::sync::atomic::{AtomicU8, Ordering};

/// Whether the engine is currently driving a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;

/// Atomic holder for [`EngineState`].
///
/// `try_begin` is the only transition into `Running`, so two concurrent
/// triggers cannot both win.
#[derive(Debug, Default)]
pub struct EngineStateCell(AtomicU8);

impl EngineStateCell {
    pub fn state(&self) -> EngineState {
        match self.0.load(Ordering::Acquire) {
            RUNNING => EngineState::Running,
            _ => EngineState::Idle,
        }
    }

    /// Attempt the `Idle -> Running` transition. Returns false if a run is
    /// already in progress.
    pub fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn finish(&self) {
        self.0.store(IDLE, Ordering::Release);
    }
}

/// How a single playlist's sync cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Edits applied and the believed state committed
    Committed,
    /// Desired sequence matched the believed state; nothing written
    Unchanged,
    /// The cycle could not run (missing playlist, no tracks, snapshot
    /// failure); nothing written
    Skipped,
    /// An insert was rejected mid-apply; earlier edits stand, believed
    /// state not committed
    Aborted,
}

/// Outcome of one playlist's cycle within a run.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Source playlist id of the link
    pub source_id: String,
    pub name: String,
    pub status: CycleStatus,
    /// Tracks newly resolved and added to the track pool
    pub resolved: usize,
    /// Source tracks dropped because resolution failed
    pub dropped: usize,
    pub inserted: usize,
    pub deleted: usize,
}

impl CycleOutcome {
    pub(crate) fn skipped(source_id: &str, name: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            name: name.to_string(),
            status: CycleStatus::Skipped,
            resolved: 0,
            dropped: 0,
            inserted: 0,
            deleted: 0,
        }
    }
}

/// Result of one `update_playlists` trigger.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// False when the trigger was dropped because a run was in progress
    pub triggered: bool,
    pub outcomes: Vec<CycleOutcome>,
}

impl SyncReport {
    pub(crate) fn dropped() -> Self {
        Self {
            triggered: false,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            triggered: true,
            outcomes: Vec::new(),
        }
    }
}
