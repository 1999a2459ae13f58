//! Unwind guard for elements constructed past the live range.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;

use stowage_raw::RawBuffer;

/// Tracks elements written into the uninitialized tail of a buffer.
///
/// Elements pushed through the guard are not yet counted as live by the
/// owning array. If construction fails part-way (an early `?` return or a
/// panic) the guard drops exactly the elements it wrote. [`commit`] hands
/// them over instead and returns the new live length.
///
/// [`commit`]: TailGuard::commit
pub(crate) struct TailGuard<'a, T> {
    buf: &'a mut RawBuffer<T>,
    start: usize,
    written: usize,
}

impl<'a, T> TailGuard<'a, T> {
    /// Start writing at slot `start`, which must be the owner's live length
    /// (every slot from `start` on is uninitialized).
    pub(crate) fn new(buf: &'a mut RawBuffer<T>, start: usize) -> Self {
        debug_assert!(start <= buf.capacity());
        Self {
            buf,
            start,
            written: 0,
        }
    }

    /// Write the next element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer has no room left; callers reserve first.
    pub(crate) fn push(&mut self, value: T) {
        let index = self.start + self.written;
        assert!(
            index < self.buf.capacity(),
            "tail write at {index} past capacity {}",
            self.buf.capacity()
        );
        // SAFETY: index < capacity, and slots past the live range are
        // uninitialized.
        unsafe { self.buf.slot_mut(index).write(value) };
        self.written += 1;
    }

    /// Keep the written elements. Returns the new live length.
    pub(crate) fn commit(self) -> usize {
        let end = self.start + self.written;
        mem::forget(self);
        end
    }
}

impl<T> Drop for TailGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: exactly the `written` slots from `start` were initialized
        // by push() and have not been handed to the owner.
        unsafe {
            let first = self.buf.slot_mut(self.start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, self.written));
        }
    }
}
