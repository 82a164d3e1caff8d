//! PaperOS Kernel Library
//!
//! A small simulated operating-system core: a page-granular memory
//! allocator, a process table with lifecycle operations, and a
//! round-robin scheduler, wired together behind a boot facade.
//!
//! The crate is a library, not a bootable image. Everything is
//! single-threaded and cooperative; callers that share a kernel between
//! components wrap it in a [`boot::SharedKernel`] handle. The core never
//! prints — it reports structured [`event::KernelEvent`]s to an injected
//! [`event::EventSink`].

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod boot;
pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod ipc;
pub mod memory;
pub mod process;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use boot::{Kernel, SharedKernel};
pub use config::KernelConfig;
pub use error::{KernelError, KernelResult};
pub use event::{EventSink, KernelEvent};
pub use memory::{PageAllocator, PageRange};
pub use process::{ProcessId, ProcessSnapshot, ProcessState};
