//! Process Management
//!
//! Process records, the ordered process table, and lifecycle state.

pub mod table;

pub use table::{Process, ProcessId, ProcessSnapshot, ProcessState, ProcessTable};
