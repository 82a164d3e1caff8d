//! Process scheduling.
//!
//! A single round-robin policy over the live process table. The
//! scheduler owns only its cursor; process records live in the table.

pub mod round_robin;

pub use round_robin::RoundRobin;
