/// Configuration recognized at queue construction.
///
/// A small builder struct consumed once by
/// [`MessageQueue::new`](crate::MessageQueue::new).
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    /// Payload bytes per message, rounded up for alignment by the Slab.
    pub message_size: usize,
    /// Advisory cache line size in bytes; see
    /// [`with_cache_line_size`](Self::with_cache_line_size).
    pub cache_line_size: usize,
    /// Requested logical capacity. The ring backing both the Allocator and
    /// the Queue is sized to the next power of two at or above this value;
    /// cells beyond `max_depth` stay permanently empty.
    pub max_depth: usize,
}

impl QueueConfig {
    pub fn new(message_size: usize, max_depth: usize) -> Self {
        Self {
            message_size,
            max_depth,
            cache_line_size: 64,
        }
    }

    /// Advisory only: this crate isolates Allocator and Queue hot state
    /// onto disjoint cache lines via a compile-time [`crossbeam_utils::CachePadded`]
    /// (see `ring.rs`), so this value does not get threaded into the actual
    /// layout. It is kept on the config struct as a forward-compatibility
    /// hook.
    pub fn with_cache_line_size(mut self, cache_line_size: usize) -> Self {
        self.cache_line_size = cache_line_size;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new(64, 1024)
    }
}
