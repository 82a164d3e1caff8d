//! Process Table
//!
//! Maintains the ordered table of live processes. The table owns the pid
//! counter: pids increase monotonically for the table's whole lifetime
//! and are never reused, independent of where a record sits after
//! compaction. Removal compacts the sequence while preserving the
//! relative order of the remaining records, which is what the scheduler
//! cursor indexes.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::PROCESS_NAME_MAX;
use crate::error::{KernelError, KernelResult};
use crate::memory::PageRange;

/// Process ID type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub u64);

impl ProcessId {
    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Ready to run.
    Ready,
    /// Currently running.
    Running,
    /// Removed from the table; only ever seen on a record returned by a
    /// kill, never on a live entry.
    Terminated,
}

/// A process record.
#[derive(Debug, Clone)]
pub struct Process {
    /// Process ID.
    pub pid: ProcessId,
    /// Process name, truncated to [`PROCESS_NAME_MAX`].
    pub name: String,
    /// Lifecycle state.
    pub state: ProcessState,
    /// Page ranges owned by this process.
    pub owned_pages: Vec<PageRange>,
}

/// Lightweight read-only view of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: ProcessId,
    pub name: String,
    pub state: ProcessState,
}

/// Ordered table of live processes.
pub struct ProcessTable {
    /// Live records in creation order (compacted on removal).
    entries: Vec<Process>,
    /// Next pid to hand out. Monotonic, never reset.
    next_pid: u64,
    /// Capacity bound.
    capacity: usize,
}

impl ProcessTable {
    /// Create an empty table with the given capacity.
    pub fn new(capacity: usize) -> Self {
        ProcessTable {
            entries: Vec::new(),
            next_pid: 1,
            capacity,
        }
    }

    /// Append a new Ready process and return its pid.
    ///
    /// Fails with [`KernelError::TableFull`] at capacity. Names longer
    /// than [`PROCESS_NAME_MAX`] are truncated, matching the fixed name
    /// buffers this table is configured around.
    pub fn create(&mut self, name: &str) -> KernelResult<ProcessId> {
        if self.entries.len() >= self.capacity {
            return Err(KernelError::TableFull);
        }

        let pid = ProcessId(self.next_pid);
        self.next_pid += 1;

        let mut name = String::from(name);
        if name.len() > PROCESS_NAME_MAX {
            let mut cut = PROCESS_NAME_MAX;
            // Back off to a char boundary.
            while !name.is_char_boundary(cut) {
                cut -= 1;
            }
            name.truncate(cut);
        }

        self.entries.push(Process {
            pid,
            name,
            state: ProcessState::Ready,
            owned_pages: Vec::new(),
        });
        Ok(pid)
    }

    /// Index of the record with the given pid.
    pub fn index_of(&self, pid: ProcessId) -> Option<usize> {
        self.entries.iter().position(|p| p.pid == pid)
    }

    /// Get a record by pid.
    pub fn get(&self, pid: ProcessId) -> Option<&Process> {
        self.entries.iter().find(|p| p.pid == pid)
    }

    /// Get a mutable record by pid.
    pub fn get_mut(&mut self, pid: ProcessId) -> Option<&mut Process> {
        self.entries.iter_mut().find(|p| p.pid == pid)
    }

    /// Remove the record at `index`, compacting the sequence.
    ///
    /// Relative order of the remaining records is preserved.
    pub fn remove_at(&mut self, index: usize) -> Process {
        self.entries.remove(index)
    }

    /// Record at `index`.
    pub fn entry_at(&self, index: usize) -> &Process {
        &self.entries[index]
    }

    /// Mutable record at `index`.
    pub fn entry_at_mut(&mut self, index: usize) -> &mut Process {
        &mut self.entries[index]
    }

    /// The currently Running record, if any.
    pub fn running_mut(&mut self) -> Option<&mut Process> {
        self.entries
            .iter_mut()
            .find(|p| p.state == ProcessState::Running)
    }

    /// Read-only ordered snapshot of `(pid, name, state)`.
    pub fn snapshot(&self) -> Vec<ProcessSnapshot> {
        self.entries
            .iter()
            .map(|p| ProcessSnapshot {
                pid: p.pid,
                name: p.name.clone(),
                state: p.state,
            })
            .collect()
    }

    /// Number of live processes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over live records in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pids_are_monotonic_and_not_reused() {
        let mut table = ProcessTable::new(8);
        let a = table.create("a").unwrap();
        let b = table.create("b").unwrap();
        assert!(a.0 < b.0);

        let index = table.index_of(a).unwrap();
        table.remove_at(index);

        // A fresh record never gets a dead pid back.
        let c = table.create("c").unwrap();
        assert!(b.0 < c.0);
        assert!(table.index_of(a).is_none());
    }

    #[test]
    fn table_full_at_capacity() {
        let mut table = ProcessTable::new(2);
        table.create("a").unwrap();
        table.create("b").unwrap();
        assert_eq!(table.create("c"), Err(KernelError::TableFull));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn removal_preserves_order() {
        let mut table = ProcessTable::new(8);
        let a = table.create("a").unwrap();
        let b = table.create("b").unwrap();
        let c = table.create("c").unwrap();

        table.remove_at(table.index_of(b).unwrap());

        let pids: Vec<ProcessId> = table.snapshot().iter().map(|s| s.pid).collect();
        assert_eq!(pids, alloc::vec![a, c]);
    }

    #[test]
    fn long_names_are_truncated() {
        let mut table = ProcessTable::new(2);
        let long = "x".repeat(100);
        let pid = table.create(&long).unwrap();
        assert_eq!(table.get(pid).unwrap().name.len(), PROCESS_NAME_MAX);
    }

    #[test]
    fn new_processes_start_ready_without_pages() {
        let mut table = ProcessTable::new(2);
        let pid = table.create("init").unwrap();
        let proc = table.get(pid).unwrap();
        assert_eq!(proc.state, ProcessState::Ready);
        assert!(proc.owned_pages.is_empty());
    }
}
