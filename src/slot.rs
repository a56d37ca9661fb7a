use std::fmt;

/// A handle to one slab slot.
///
/// `Slot` carries no payload itself — it is an opaque index into the
/// [`Slab`](crate::slab::Slab) that owns the backing bytes. At any instant
/// exactly one of the Allocator, a producer, the Queue, or a consumer holds
/// a given `Slot` value; that single-owner discipline is what lets
/// [`MessageQueue`](crate::MessageQueue) hand out `&mut [u8]` views safely
/// without locking the payload itself.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Slot(pub(crate) u32);

impl Slot {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
