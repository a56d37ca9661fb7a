//! C ABI surface over [`crate::MessageQueue`]: an opaque handle type
//! wrapping the safe Rust object, `#[no_mangle] extern "C"` entry points,
//! and small negative error codes instead of panics across the FFI
//! boundary.

use std::ptr;
use std::time::Duration;

use crate::config::QueueConfig;
use crate::MessageQueue;

const RINGSLAB_SUCCESS: i32 = 0;
const RINGSLAB_ERROR_NULL_POINTER: i32 = -1;
const RINGSLAB_ERROR_INVALID_ARG: i32 = -2;
const RINGSLAB_ERROR_ALLOCATION_FAILED: i32 = -3;
const RINGSLAB_ERROR_EMPTY: i32 = -4;

/// Opaque handle to a [`MessageQueue`].
pub struct QueueHandle {
    inner: MessageQueue,
}

/// `init`: build a queue with `message_size` bytes per slot and
/// `max_depth` logical capacity. Returns NULL on failure — every init
/// error variant collapses to a single NULL since this FFI layer has no
/// richer channel back to the caller than a pointer.
#[no_mangle]
pub extern "C" fn ringslab_init(message_size: usize, max_depth: usize) -> *mut QueueHandle {
    match MessageQueue::new(QueueConfig::new(message_size, max_depth)) {
        Ok(queue) => Box::into_raw(Box::new(QueueHandle { inner: queue })),
        Err(err) => {
            tracing::error!(%err, "ringslab_init failed");
            ptr::null_mut()
        }
    }
}

/// `alloc`: hand out a slot, encoded as the slot's index, or a negative
/// value if the freelist is exhausted.
#[no_mangle]
pub extern "C" fn ringslab_alloc(handle: *const QueueHandle) -> i64 {
    let Some(queue) = (unsafe { handle.as_ref() }) else {
        return RINGSLAB_ERROR_NULL_POINTER as i64;
    };
    match queue.inner.alloc() {
        Some(slot) => slot.index() as i64,
        None => RINGSLAB_ERROR_ALLOCATION_FAILED as i64,
    }
}

/// `free`: return a slot (by index) to the allocator. Undefined if the
/// slot is foreign or already free.
#[no_mangle]
pub extern "C" fn ringslab_free(handle: *const QueueHandle, slot_index: u32) -> i32 {
    let Some(queue) = (unsafe { handle.as_ref() }) else {
        return RINGSLAB_ERROR_NULL_POINTER;
    };
    queue.inner.free(crate::slot::Slot(slot_index));
    RINGSLAB_SUCCESS
}

/// `write`: publish a filled slot (by index) to the queue.
#[no_mangle]
pub extern "C" fn ringslab_write(handle: *const QueueHandle, slot_index: u32) -> i32 {
    let Some(queue) = (unsafe { handle.as_ref() }) else {
        return RINGSLAB_ERROR_NULL_POINTER;
    };
    queue.inner.write(crate::slot::Slot(slot_index));
    RINGSLAB_SUCCESS
}

/// `tryread`: non-blocking read. Writes the slot index to `out_slot` and
/// returns `RINGSLAB_SUCCESS`, or returns `RINGSLAB_ERROR_EMPTY` if no
/// message is currently available.
#[no_mangle]
pub extern "C" fn ringslab_tryread(handle: *const QueueHandle, out_slot: *mut u32) -> i32 {
    let Some(queue) = (unsafe { handle.as_ref() }) else {
        return RINGSLAB_ERROR_NULL_POINTER;
    };
    if out_slot.is_null() {
        return RINGSLAB_ERROR_INVALID_ARG;
    }
    match queue.inner.try_read() {
        Some(slot) => {
            unsafe { *out_slot = slot.0 };
            RINGSLAB_SUCCESS
        }
        None => RINGSLAB_ERROR_EMPTY,
    }
}

/// `read`: blocks until a message is available, returning its slot index.
#[no_mangle]
pub extern "C" fn ringslab_read(handle: *const QueueHandle) -> i64 {
    let Some(queue) = (unsafe { handle.as_ref() }) else {
        return RINGSLAB_ERROR_NULL_POINTER as i64;
    };
    queue.inner.read().index() as i64
}

/// Blocks up to `timeout_ms` milliseconds for a message; returns a
/// negative value on timeout. A convenience layered on the same wake
/// pairing `read` uses.
#[no_mangle]
pub extern "C" fn ringslab_read_timeout(handle: *const QueueHandle, timeout_ms: u64) -> i64 {
    let Some(queue) = (unsafe { handle.as_ref() }) else {
        return RINGSLAB_ERROR_NULL_POINTER as i64;
    };
    match queue.inner.read_timeout(Duration::from_millis(timeout_ms)) {
        Some(slot) => slot.index() as i64,
        None => RINGSLAB_ERROR_EMPTY as i64,
    }
}

/// `destroy`: release the handle. Undefined under concurrent use — the
/// caller must ensure no other thread is still calling into this handle.
#[no_mangle]
pub extern "C" fn ringslab_destroy(handle: *mut QueueHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}
