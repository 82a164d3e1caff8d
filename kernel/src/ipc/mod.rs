//! Inter-process messaging.
//!
//! A single bounded queue of addressed messages. Delivery is pull-based:
//! a receiver drains everything addressed to it in one call. There is no
//! blocking — the queue either accepts a message or reports it full.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{KernelError, KernelResult};
use crate::process::ProcessId;

/// An addressed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Sender pid.
    pub from: ProcessId,
    /// Receiver pid.
    pub to: ProcessId,
    /// Message body.
    pub body: String,
}

/// Bounded FIFO message queue.
pub struct MessageQueue {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageQueue {
    /// Create an empty queue with the given capacity.
    pub fn new(capacity: usize) -> Self {
        MessageQueue {
            messages: VecDeque::new(),
            capacity,
        }
    }

    /// Queue a message.
    ///
    /// Fails with [`KernelError::QueueFull`] at capacity; the queue is
    /// unchanged on failure.
    pub fn send(&mut self, message: Message) -> KernelResult<()> {
        if self.messages.len() >= self.capacity {
            return Err(KernelError::QueueFull);
        }
        self.messages.push_back(message);
        Ok(())
    }

    /// Drain and return every message addressed to `pid`, oldest first.
    pub fn receive(&mut self, pid: ProcessId) -> Vec<Message> {
        let mut delivered = Vec::new();
        self.messages.retain(|m| {
            if m.to == pid {
                delivered.push(m.clone());
                false
            } else {
                true
            }
        });
        delivered
    }

    /// Discard every message addressed to `pid`.
    ///
    /// Called when a process dies; messages it already sent to live
    /// receivers still deliver.
    pub fn discard_for(&mut self, pid: ProcessId) {
        self.messages.retain(|m| m.to != pid);
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
