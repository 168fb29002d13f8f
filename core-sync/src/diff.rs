//! Ordered edit plans for reconciling a live playlist with a desired
//! sequence.
//!
//! The plan is a pairwise walk over the desired sequence: a mismatch at a
//! position deletes the live item there, re-checks the item that shifted
//! into the slot, and inserts only if it still differs. Items past the end
//! of the desired sequence are deleted from the tail. There is no move
//! edit; a permutation of the same members is rewritten with deletes and
//! inserts.
//!
//! Indices in the plan account for the shifts caused by earlier edits, so
//! applying the edits in order against the live playlist is positionally
//! correct.

/// One positional mutation of the target playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert `track_id` at `position`, shifting later items up.
    Insert { track_id: String, position: usize },
    /// Delete the item at `index`, shifting later items down.
    Delete { index: usize },
}

/// Compute the edits that turn `current` into `desired`.
///
/// Both slices are target-service track ids. An empty plan means the
/// playlist already matches.
pub fn edit_plan(current: &[String], desired: &[String]) -> Vec<Edit> {
    let mut live: Vec<String> = current.to_vec();
    let mut edits = Vec::new();

    for (i, want) in desired.iter().enumerate() {
        if live.get(i) == Some(want) {
            continue;
        }

        if i < live.len() {
            edits.push(Edit::Delete { index: i });
            live.remove(i);
            // The next item shifted into this slot; it may already match.
            if live.get(i) == Some(want) {
                continue;
            }
        }

        edits.push(Edit::Insert {
            track_id: want.clone(),
            position: i,
        });
        live.insert(i, want.clone());
    }

    while live.len() > desired.len() {
        edits.push(Edit::Delete {
            index: desired.len(),
        });
        live.remove(desired.len());
    }

    edits
}
