//! Kernel behavior tests.
//!
//! Cross-subsystem tests that go through the [`crate::Kernel`] facade;
//! unit tests for each subsystem live next to the code they test.


use crate::config::KernelConfig;
use crate::event::NullSink;
use crate::Kernel;

/// Boot a kernel with default capacities and no event capture.
fn boot() -> Kernel {
    Kernel::boot(KernelConfig::default(), NullSink)
}

/// Boot a kernel with explicit capacities and no event capture.
fn boot_with(config: KernelConfig) -> Kernel {
    Kernel::boot(config, NullSink)
}
