//! Round-robin scheduler policy.
//!
//! The cursor is an index into the live process sequence and persists
//! across scheduling rounds: with N live processes, N consecutive ticks
//! visit each one exactly once, in table order. Removing a record
//! invalidates indexes at or after it, so every removal must be reported
//! through [`RoundRobin::note_removed`] — the repaired cursor always
//! stays inside the live sequence.

use crate::process::{ProcessId, ProcessState, ProcessTable};

/// Round-robin policy state.
pub struct RoundRobin {
    /// Index of the last-scheduled record; `None` before the first tick
    /// and whenever the table empties.
    cursor: Option<usize>,
}

impl RoundRobin {
    /// Create a scheduler that has not run anything yet.
    pub fn new() -> Self {
        RoundRobin { cursor: None }
    }

    /// Advance one scheduling round.
    ///
    /// No-op returning `None` on an empty table. Otherwise the cursor
    /// moves cyclically to the next record, the previously Running
    /// record (if any) drops back to Ready, and the record under the new
    /// cursor becomes Running. Returns the newly running pid.
    pub fn tick(&mut self, table: &mut ProcessTable) -> Option<ProcessId> {
        if table.is_empty() {
            self.cursor = None;
            return None;
        }

        let len = table.len();
        let next = match self.cursor {
            Some(cursor) => (cursor + 1) % len,
            None => 0,
        };

        if let Some(prev) = table.running_mut() {
            prev.state = ProcessState::Ready;
        }

        let entry = table.entry_at_mut(next);
        entry.state = ProcessState::Running;
        self.cursor = Some(next);
        Some(entry.pid)
    }

    /// Repair the cursor after the record at `removed_index` left a
    /// table that now holds `remaining` records.
    ///
    /// Removing the cursor's own record or one before it shifts the
    /// cursor back by one, so the next tick runs the removed record's
    /// successor rather than skipping it. An empty table resets the
    /// cursor entirely.
    pub fn note_removed(&mut self, removed_index: usize, remaining: usize) {
        if remaining == 0 {
            self.cursor = None;
            return;
        }
        if let Some(cursor) = self.cursor {
            if removed_index <= cursor {
                self.cursor = if cursor == 0 { None } else { Some(cursor - 1) };
            }
            // Removal after the cursor leaves it in bounds:
            // cursor < removed_index <= remaining.
            debug_assert!(self.cursor.map_or(true, |c| c < remaining));
        }
    }

    /// Index of the last-scheduled record, if a round has run.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}
