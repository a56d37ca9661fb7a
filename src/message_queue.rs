use std::time::Duration;

use crate::allocator::Allocator;
use crate::config::QueueConfig;
use crate::error::QueueInitError;
use crate::queue::Queue;
use crate::slab::Slab;
use crate::slot::Slot;

/// A fixed-capacity, multi-producer/multi-consumer in-process message
/// queue with a paired slab allocator.
///
/// Lifecycle: built in one shot by [`MessageQueue::new`], torn down by
/// `Drop`. No slot may be in flight — held by user code, enqueued, or mid
/// freelist transition — when the queue is dropped; this is a user
/// contract the type cannot enforce.
pub struct MessageQueue {
    slab: Slab,
    allocator: Allocator,
    queue: Queue,
}

impl MessageQueue {
    /// Builds the Slab, Allocator and Queue in order. Any failure unwinds
    /// the pieces already constructed.
    pub fn new(config: QueueConfig) -> Result<Self, QueueInitError> {
        tracing::debug!(
            message_size = config.message_size,
            max_depth = config.max_depth,
            "initializing message queue"
        );

        let slab = Slab::new(config.message_size, config.max_depth)?;
        let allocator = Allocator::new(&slab);
        let queue = Queue::new(config.max_depth);

        Ok(Self {
            slab,
            allocator,
            queue,
        })
    }

    /// Hands out a slot owned exclusively by the caller until it is
    /// written or freed, or `None` if the freelist is exhausted.
    pub fn alloc(&self) -> Option<Slot> {
        self.allocator.alloc()
    }

    /// Returns a slot to the allocator. Must not currently be enqueued.
    pub fn free(&self, slot: Slot) {
        self.allocator.free(slot);
    }

    /// Hands a filled slot to the queue for delivery to a consumer.
    pub fn write(&self, slot: Slot) {
        self.queue.write(slot);
    }

    /// Non-blocking read; `None` iff the queue is currently empty.
    pub fn try_read(&self) -> Option<Slot> {
        self.queue.try_read()
    }

    /// Blocks until a message is available.
    pub fn read(&self) -> Slot {
        self.queue.read()
    }

    /// Blocks until a message is available or `timeout` elapses.
    pub fn read_timeout(&self, timeout: Duration) -> Option<Slot> {
        self.queue.read_timeout(timeout)
    }

    /// Exclusive view of `slot`'s payload bytes.
    ///
    /// Safe to call, but only sound to *use* while the caller is the
    /// current owner of `slot` per the Allocator→producer→Queue→consumer
    /// handoff — holding two `&mut` views of the same slot concurrently is
    /// a programming fault this type cannot rule out statically.
    pub fn payload_mut(&self, slot: Slot) -> &mut [u8] {
        self.slab.slot_mut(slot.index())
    }

    /// Shared view of `slot`'s payload bytes.
    pub fn payload(&self, slot: Slot) -> &[u8] {
        self.slab.slot(slot.index())
    }

    /// Padded per-message size in bytes.
    pub fn message_size(&self) -> usize {
        self.slab.message_size()
    }

    /// Requested logical capacity.
    pub fn max_depth(&self) -> usize {
        self.slab.max_depth()
    }
}

impl Drop for MessageQueue {
    fn drop(&mut self) {
        tracing::debug!("destroying message queue");
    }
}
