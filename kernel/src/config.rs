//! Kernel configuration constants.
//!
//! Compile-time defaults for capacities and layout. Every bound is also
//! carried at runtime in [`KernelConfig`] so that exceeding it is a
//! reportable error rather than undefined behavior.

/// Page size in bytes (4 KB).
pub const PAGE_SIZE: usize = 4096;

/// Default number of pages managed by the page allocator.
pub const MAX_PAGES: usize = 256;

/// Default maximum number of processes.
pub const MAX_PROCESSES: usize = 32;

/// Default maximum number of queued IPC messages.
pub const MAX_MESSAGES: usize = 64;

/// Default maximum number of files in the file table.
pub const MAX_FILES: usize = 16;

/// Maximum process name length; longer names are truncated.
pub const PROCESS_NAME_MAX: usize = 31;

/// Runtime capacities for one kernel instance.
///
/// Passed to [`crate::Kernel::boot`]; defaults match the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Number of pages managed by the page allocator.
    pub max_pages: usize,
    /// Process table capacity.
    pub max_processes: usize,
    /// IPC message queue capacity.
    pub max_messages: usize,
    /// File table capacity.
    pub max_files: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            max_pages: MAX_PAGES,
            max_processes: MAX_PROCESSES,
            max_messages: MAX_MESSAGES,
            max_files: MAX_FILES,
        }
    }
}
