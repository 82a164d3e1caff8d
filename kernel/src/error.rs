//! Kernel error types.
//!
//! A single crate-wide error enum. Every variant is recoverable: the
//! caller decides whether to retry, report, or abort. The kernel itself
//! never terminates the host process on any of these.

use core::fmt;

/// Result alias for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;

/// Kernel operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// No sufficiently large run of free pages exists.
    OutOfMemory,
    /// A page range is empty, out of bounds, already free (double-free),
    /// or not owned by the process releasing it.
    InvalidRange,
    /// A fixed-capacity table (process or file) is full.
    TableFull,
    /// The referenced pid or file does not exist.
    NotFound,
    /// The IPC message queue is at capacity.
    QueueFull,
    /// A file with this name already exists.
    AlreadyExists,
    /// The file's permission flags forbid the requested access.
    PermissionDenied,
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::OutOfMemory => write!(f, "out of memory"),
            KernelError::InvalidRange => write!(f, "invalid page range"),
            KernelError::TableFull => write!(f, "table full"),
            KernelError::NotFound => write!(f, "not found"),
            KernelError::QueueFull => write!(f, "message queue full"),
            KernelError::AlreadyExists => write!(f, "already exists"),
            KernelError::PermissionDenied => write!(f, "permission denied"),
        }
    }
}
