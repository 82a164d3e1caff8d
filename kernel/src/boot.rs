//! Boot entry point and kernel facade.
//!
//! [`Kernel::boot`] initializes every subsystem and hands the kernel
//! back to the caller's driver loop — there is no idle loop here. The
//! facade methods are the only place cross-subsystem invariants are
//! enforced: killing a process returns its pages to the allocator,
//! discards its pending messages, and repairs the scheduler cursor in
//! one step.

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::Mutex;

use crate::config::KernelConfig;
use crate::error::{KernelError, KernelResult};
use crate::event::{EventSink, KernelEvent};
use crate::fs::{FileEntry, FilePerms, FileSystem};
use crate::ipc::{Message, MessageQueue};
use crate::memory::{PageAllocator, PageRange};
use crate::process::{ProcessId, ProcessSnapshot, ProcessState, ProcessTable};
use crate::scheduler::RoundRobin;

/// The simulated kernel: allocator, process table, scheduler, IPC queue
/// and file table behind one owned state object.
pub struct Kernel {
    allocator: PageAllocator,
    table: ProcessTable,
    scheduler: RoundRobin,
    ipc: MessageQueue,
    fs: FileSystem,
    sink: Box<dyn EventSink + Send>,
}

impl Kernel {
    /// Initialize every subsystem and return the kernel.
    ///
    /// Events are reported to `sink`; pass [`crate::event::NullSink`]
    /// to discard them.
    pub fn boot(config: KernelConfig, sink: impl EventSink + Send + 'static) -> Self {
        let mut kernel = Kernel {
            allocator: PageAllocator::new(config.max_pages),
            table: ProcessTable::new(config.max_processes),
            scheduler: RoundRobin::new(),
            ipc: MessageQueue::new(config.max_messages),
            fs: FileSystem::new(config.max_files),
            sink: Box::new(sink),
        };
        log::info!("[kernel] boot: {} pages, {} process slots", config.max_pages, config.max_processes);
        kernel.sink.record(KernelEvent::Booted {
            pages: config.max_pages,
        });
        kernel
    }

    /// Record a denied operation and hand the error back to the caller.
    fn fail(&mut self, op: &'static str, error: KernelError) -> KernelError {
        self.sink.record(KernelEvent::OperationFailed { op, error });
        error
    }

    // ──────────────────────────── processes ────────────────────────────

    /// Create a Ready process and return its pid.
    pub fn create_process(&mut self, name: &str) -> KernelResult<ProcessId> {
        let pid = match self.table.create(name) {
            Ok(pid) => pid,
            Err(err) => return Err(self.fail("create_process", err)),
        };
        self.sink.record(KernelEvent::ProcessCreated {
            pid,
            name: name.to_string(),
        });
        Ok(pid)
    }

    /// Kill a process: free all its page ranges, discard its pending
    /// messages, remove its record, and repair the scheduler cursor.
    pub fn kill_process(&mut self, pid: ProcessId) -> KernelResult<()> {
        let index = match self.table.index_of(pid) {
            Some(index) => index,
            None => return Err(self.fail("kill_process", KernelError::NotFound)),
        };

        let mut record = self.table.remove_at(index);
        record.state = ProcessState::Terminated;

        // Cursor repair and message discard come first, so the kill
        // leaves no dangling references regardless of the frees below.
        self.scheduler.note_removed(index, self.table.len());
        self.ipc.discard_for(pid);

        let mut pages_released = 0;
        for range in record.owned_pages.drain(..) {
            // Ownership invariant: every owned range is live in this
            // allocator, so the free cannot fail through the facade.
            let freed = self.allocator.free(range);
            debug_assert!(freed.is_ok());
            if freed.is_ok() {
                pages_released += range.count;
            }
        }

        self.sink.record(KernelEvent::ProcessKilled {
            pid,
            pages_released,
        });
        Ok(())
    }

    /// Ordered snapshot of the live processes.
    pub fn processes(&self) -> Vec<ProcessSnapshot> {
        self.table.snapshot()
    }

    // ───────────────────────────── memory ──────────────────────────────

    /// Allocate `npages` contiguous pages owned by `pid`.
    pub fn allocate_pages(&mut self, pid: ProcessId, npages: usize) -> KernelResult<PageRange> {
        if self.table.get(pid).is_none() {
            return Err(self.fail("allocate_pages", KernelError::NotFound));
        }
        let range = match self.allocator.alloc(npages) {
            Ok(range) => range,
            Err(KernelError::OutOfMemory) => {
                self.sink.record(KernelEvent::OutOfMemory {
                    pid,
                    requested: npages,
                });
                return Err(KernelError::OutOfMemory);
            }
            Err(err) => return Err(self.fail("allocate_pages", err)),
        };
        // Lookup checked above; the record cannot have vanished since.
        if let Some(record) = self.table.get_mut(pid) {
            record.owned_pages.push(range);
        }
        self.sink.record(KernelEvent::PagesAllocated { pid, range });
        Ok(range)
    }

    /// Return a range `pid` owns to the allocator.
    ///
    /// Releasing a range the process does not own is
    /// [`KernelError::InvalidRange`].
    pub fn release_pages(&mut self, pid: ProcessId, range: PageRange) -> KernelResult<()> {
        let lookup = self
            .table
            .get(pid)
            .ok_or(KernelError::NotFound)
            .and_then(|record| {
                record
                    .owned_pages
                    .iter()
                    .position(|owned| *owned == range)
                    .ok_or(KernelError::InvalidRange)
            });
        let position = match lookup {
            Ok(position) => position,
            Err(err) => return Err(self.fail("release_pages", err)),
        };

        if let Err(err) = self.allocator.free(range) {
            return Err(self.fail("release_pages", err));
        }
        if let Some(record) = self.table.get_mut(pid) {
            record.owned_pages.remove(position);
        }
        self.sink.record(KernelEvent::PagesFreed { pid, range });
        Ok(())
    }

    /// Pages currently in use.
    pub fn used_pages(&self) -> usize {
        self.allocator.used_pages()
    }

    /// Pages currently free.
    pub fn free_pages(&self) -> usize {
        self.allocator.free_pages()
    }

    /// Pages managed in total.
    pub fn total_pages(&self) -> usize {
        self.allocator.capacity()
    }

    // ──────────────────────────── scheduling ───────────────────────────

    /// Run one scheduling round; returns the newly running pid, or
    /// `None` when no process is live.
    pub fn tick(&mut self) -> Option<ProcessId> {
        let pid = self.scheduler.tick(&mut self.table)?;
        self.sink.record(KernelEvent::Scheduled { pid });
        Some(pid)
    }

    // ──────────────────────────────── ipc ──────────────────────────────

    /// Queue a message between two live processes.
    pub fn send_message(
        &mut self,
        from: ProcessId,
        to: ProcessId,
        body: &str,
    ) -> KernelResult<()> {
        if self.table.get(from).is_none() || self.table.get(to).is_none() {
            return Err(self.fail("send_message", KernelError::NotFound));
        }
        let queued = self.ipc.send(Message {
            from,
            to,
            body: body.to_string(),
        });
        if let Err(err) = queued {
            return Err(self.fail("send_message", err));
        }
        self.sink.record(KernelEvent::MessageQueued { from, to });
        Ok(())
    }

    /// Drain and return the messages addressed to `pid`.
    pub fn receive_messages(&mut self, pid: ProcessId) -> KernelResult<Vec<Message>> {
        if self.table.get(pid).is_none() {
            return Err(self.fail("receive_messages", KernelError::NotFound));
        }
        let delivered = self.ipc.receive(pid);
        self.sink.record(KernelEvent::MessagesDelivered {
            pid,
            count: delivered.len(),
        });
        Ok(delivered)
    }

    // ──────────────────────────────── fs ───────────────────────────────

    /// Create an empty file.
    pub fn create_file(&mut self, name: &str, perms: FilePerms) -> KernelResult<()> {
        if let Err(err) = self.fs.create(name, perms) {
            return Err(self.fail("create_file", err));
        }
        self.sink.record(KernelEvent::FileCreated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Delete a file.
    pub fn delete_file(&mut self, name: &str) -> KernelResult<()> {
        if let Err(err) = self.fs.delete(name) {
            return Err(self.fail("delete_file", err));
        }
        self.sink.record(KernelEvent::FileDeleted {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Replace a file's contents.
    pub fn write_file(&mut self, name: &str, data: &[u8]) -> KernelResult<()> {
        self.fs
            .write(name, data)
            .map_err(|err| self.fail("write_file", err))
    }

    /// Read a file's contents.
    pub fn read_file(&self, name: &str) -> KernelResult<&[u8]> {
        self.fs.read(name)
    }

    /// Name-sorted file listing.
    pub fn list_files(&self) -> Vec<FileEntry> {
        self.fs.list()
    }
}

/// Cloneable handle that serializes all kernel mutation behind one lock.
///
/// The core itself is single-threaded; when several components share a
/// kernel (say a driver loop plus simulated interrupt handlers), every
/// mutating call must go through one mutual-exclusion discipline. This
/// handle is that discipline.
#[derive(Clone)]
pub struct SharedKernel {
    inner: Arc<Mutex<Kernel>>,
}

impl SharedKernel {
    /// Wrap a booted kernel.
    pub fn new(kernel: Kernel) -> Self {
        SharedKernel {
            inner: Arc::new(Mutex::new(kernel)),
        }
    }

    /// Run `f` with exclusive access to the kernel.
    pub fn with<R>(&self, f: impl FnOnce(&mut Kernel) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NullSink;

    #[test]
    fn shared_kernel_serializes_callers() {
        let shared = SharedKernel::new(Kernel::boot(KernelConfig::default(), NullSink));

        let handles: alloc::vec::Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..4 {
                        shared.with(|k| k.create_process("worker")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = shared.with(|k| k.processes());
        assert_eq!(snapshot.len(), 16);
        // Every pid unique even under contention.
        let mut pids: alloc::vec::Vec<_> = snapshot.iter().map(|p| p.pid).collect();
        pids.sort();
        pids.dedup();
        assert_eq!(pids.len(), 16);
    }
}
