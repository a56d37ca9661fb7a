use thiserror::Error;

/// Failure building a [`MessageQueue`](crate::MessageQueue).
///
/// Every variant is reported before any other component is constructed —
/// `Slab`, `Allocator`, `Queue` and the wait primitive come up in order and
/// the whole attempt unwinds on the first failure.
#[derive(Debug, Error)]
pub enum QueueInitError {
    /// `message_size` or `max_depth` was zero.
    #[error("invalid queue configuration: message_size and max_depth must both be non-zero")]
    InvalidConfig,

    /// The slab's backing allocation could not be obtained from the system
    /// allocator.
    #[error("failed to allocate {0} bytes for the slab backing buffer")]
    Allocation(usize),
}
