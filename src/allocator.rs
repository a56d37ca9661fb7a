use crate::ring::Ring;
use crate::slab::Slab;
use crate::slot::Slot;

/// The bounded concurrent freelist: dispenses and reclaims slab slots via
/// a [`Ring`] seeded with every slot index up front.
pub struct Allocator {
    ring: Ring<Slot>,
}

impl Allocator {
    /// Seeds the freelist with every slot in `slab`.
    pub fn new(slab: &Slab) -> Self {
        let values = (0..slab.max_depth() as u32).map(Slot);
        Self {
            ring: Ring::seeded(slab.max_depth(), values),
        }
    }

    /// Hands out a slot exclusively to the caller, or `None` if the
    /// freelist is empty. Non-blocking, safe under concurrent producers.
    pub fn alloc(&self) -> Option<Slot> {
        self.ring.take()
    }

    /// Returns `slot` to the freelist. The slot must have originated from
    /// this allocator and must not currently be enqueued — undefined
    /// otherwise.
    pub fn free(&self, slot: Slot) {
        self.ring.give(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausts_then_recovers_after_free() {
        let slab = Slab::new(4, 2).unwrap();
        let alloc = Allocator::new(&slab);

        let a = alloc.alloc().expect("slot 1");
        let b = alloc.alloc().expect("slot 2");
        assert!(alloc.alloc().is_none(), "freelist should be exhausted");

        alloc.free(a);
        let c = alloc.alloc().expect("slot freed by a should be reusable");
        assert_eq!(a, c);

        alloc.free(b);
        alloc.free(c);
    }

    #[test]
    fn never_hands_out_the_same_slot_twice_without_a_free() {
        let slab = Slab::new(4, 64).unwrap();
        let alloc = Allocator::new(&slab);
        let mut seen = std::collections::HashSet::new();
        while let Some(slot) = alloc.alloc() {
            assert!(seen.insert(slot), "duplicate slot handed out: {slot:?}");
        }
        assert_eq!(seen.len(), 64);
    }
}
