use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::ring::Ring;
use crate::slot::Slot;

/// Number of bounded-spin attempts `read` makes before parking.
const SPIN_ATTEMPTS: u32 = 10;

/// The bounded concurrent FIFO of in-flight messages, paired with the
/// blocking-read wake coordination below.
///
/// Uses a local `Mutex` + `Condvar` pair rather than a named, filesystem-
/// visible semaphore: a PID-and-address-derived semaphore name can race
/// another process reusing the same PID, so it's not reached for here.
pub struct Queue {
    ring: Ring<Slot>,
    blocked_readers: Mutex<usize>,
    condvar: Condvar,
}

impl Queue {
    pub fn new(logical_bound: usize) -> Self {
        Self {
            ring: Ring::empty(logical_bound),
            blocked_readers: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }

    /// Publishes `slot`. Never fails — the caller has at most `max_depth`
    /// outstanding slots by construction, since the Allocator bounds them.
    ///
    /// After publishing, wakes exactly one blocked reader if any are
    /// waiting. The decrement of `blocked_readers` and the decision to
    /// notify happen under the same lock, pairing each increment with
    /// exactly one post.
    pub fn write(&self, slot: Slot) {
        self.ring.give(slot);

        let mut blocked = self.blocked_readers.lock();
        if *blocked > 0 {
            *blocked -= 1;
            self.condvar.notify_one();
        }
    }

    /// Non-blocking. `None` iff no message is currently available.
    pub fn try_read(&self) -> Option<Slot> {
        self.ring.take()
    }

    /// Blocks until a slot is available.
    pub fn read(&self) -> Slot {
        if let Some(slot) = self.spin_read() {
            return slot;
        }

        loop {
            let mut blocked = self.blocked_readers.lock();
            // Re-check under the same lock `write` uses for its publish
            // check — without this, a `write` that completes between our
            // last spin attempt and taking the lock would publish a
            // message with nobody registered yet to receive its wake.
            if let Some(slot) = self.try_read() {
                return slot;
            }
            *blocked += 1;
            self.condvar.wait(&mut blocked);
            drop(blocked);

            if let Some(slot) = self.try_read() {
                return slot;
            }
            // Spurious wakeup (or another reader won the race for the
            // message that woke us) — retry from the top.
        }
    }

    /// Blocks until a slot is available or `timeout` elapses. A
    /// cancellable, time-bounded convenience on top of `read`/`try_read`.
    pub fn read_timeout(&self, timeout: Duration) -> Option<Slot> {
        let start = Instant::now();

        if let Some(slot) = self.spin_read() {
            return Some(slot);
        }

        loop {
            let mut blocked = self.blocked_readers.lock();
            if let Some(slot) = self.try_read() {
                return Some(slot);
            }

            let remaining = timeout.checked_sub(start.elapsed())?;
            *blocked += 1;
            let result = self.condvar.wait_for(&mut blocked, remaining);

            if result.timed_out() {
                // We were never notified, so `write` never decremented our
                // registration on our behalf — do it ourselves so a future
                // `write` doesn't under-count real waiters.
                *blocked = blocked.saturating_sub(1);
                drop(blocked);
                return self.try_read();
            }
            drop(blocked);

            if let Some(slot) = self.try_read() {
                return Some(slot);
            }
            if start.elapsed() >= timeout {
                return None;
            }
        }
    }

    fn spin_read(&self) -> Option<Slot> {
        for _ in 0..SPIN_ATTEMPTS {
            if let Some(slot) = self.try_read() {
                return Some(slot);
            }
            std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
        }
        None
    }
}
