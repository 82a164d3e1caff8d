//! Structured kernel events.
//!
//! The core never writes text directly. Every operation reports a typed
//! [`KernelEvent`] to an injected [`EventSink`], so presentation (serial
//! console, test capture, nothing at all) stays outside the core.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::Mutex;

use crate::error::KernelError;
use crate::memory::PageRange;
use crate::process::ProcessId;

/// A structured event emitted by a kernel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelEvent {
    /// The kernel finished booting.
    Booted {
        /// Pages managed by the allocator.
        pages: usize,
    },
    /// A page range was handed out.
    PagesAllocated { pid: ProcessId, range: PageRange },
    /// A page range was returned.
    PagesFreed { pid: ProcessId, range: PageRange },
    /// An allocation request could not be satisfied.
    OutOfMemory { pid: ProcessId, requested: usize },
    /// A process entered the table.
    ProcessCreated { pid: ProcessId, name: String },
    /// A process was removed; `pages_released` counts pages returned.
    ProcessKilled { pid: ProcessId, pages_released: usize },
    /// The scheduler picked a process to run.
    Scheduled { pid: ProcessId },
    /// A message was queued.
    MessageQueued { from: ProcessId, to: ProcessId },
    /// Queued messages were delivered to a receiver.
    MessagesDelivered { pid: ProcessId, count: usize },
    /// A file was created.
    FileCreated { name: String },
    /// A file was deleted.
    FileDeleted { name: String },
    /// A mutating operation was denied.
    ///
    /// Out-of-memory denials report as [`KernelEvent::OutOfMemory`]
    /// instead, which carries the request size.
    OperationFailed {
        op: &'static str,
        error: KernelError,
    },
}

/// Receiver for kernel events.
///
/// Implementations must not call back into the kernel.
pub trait EventSink {
    /// Record one event.
    fn record(&mut self, event: KernelEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: KernelEvent) {}
}

/// Sink that forwards events through the `log` facade.
///
/// Lifecycle events log at info, allocator traffic at debug, failures at
/// warn. Tags follow the subsystem that produced the event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: KernelEvent) {
        match event {
            KernelEvent::Booted { pages } => {
                log::info!("[kernel] booted, {} pages managed", pages);
            }
            KernelEvent::PagesAllocated { pid, range } => {
                log::debug!("[vmm] pid {} allocated {}", pid, range);
            }
            KernelEvent::PagesFreed { pid, range } => {
                log::debug!("[vmm] pid {} freed {}", pid, range);
            }
            KernelEvent::OutOfMemory { pid, requested } => {
                log::warn!("[vmm] pid {} denied {} pages: out of memory", pid, requested);
            }
            KernelEvent::ProcessCreated { pid, name } => {
                log::info!("[proc] created {} (pid={})", name, pid);
            }
            KernelEvent::ProcessKilled { pid, pages_released } => {
                log::info!("[proc] killed pid={}, released {} pages", pid, pages_released);
            }
            KernelEvent::Scheduled { pid } => {
                log::debug!("[sched] running pid={}", pid);
            }
            KernelEvent::MessageQueued { from, to } => {
                log::debug!("[ipc] message {} -> {}", from, to);
            }
            KernelEvent::MessagesDelivered { pid, count } => {
                log::debug!("[ipc] delivered {} messages to pid={}", count, pid);
            }
            KernelEvent::FileCreated { name } => {
                log::info!("[fs] created {}", name);
            }
            KernelEvent::FileDeleted { name } => {
                log::info!("[fs] deleted {}", name);
            }
            KernelEvent::OperationFailed { op, error } => {
                log::warn!("[kernel] {} denied: {}", op, error);
            }
        }
    }
}

/// Sink that captures events into a shared buffer.
///
/// The buffer handle survives handing the sink to the kernel, so callers
/// (and tests) can inspect what the core reported.
#[derive(Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<KernelEvent>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        MemorySink {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the captured events.
    pub fn events(&self) -> Arc<Mutex<Vec<KernelEvent>>> {
        self.events.clone()
    }

    /// Snapshot of the captured events.
    pub fn snapshot(&self) -> Vec<KernelEvent> {
        self.events.lock().clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: KernelEvent) {
        self.events.lock().push(event);
    }
}
