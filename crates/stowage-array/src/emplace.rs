//! Appending, inserting and erasing single elements.

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::ptr;

use stowage_core::{growth, ConstructError, StorageError};
use stowage_raw::RawBuffer;

use crate::array::DynArray;
use crate::relocate::relocate;

impl<T> DynArray<T> {
    /// Append `value`. Amortized O(1).
    ///
    /// Returns a reference to the stored element. On allocation failure the
    /// array is unchanged and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<&mut T, StorageError> {
        self.emplace_back_with(|| value)
    }

    /// Append the element produced by `f`.
    ///
    /// When the array is full, `f` runs only after the grown storage has
    /// been allocated, and its result is placed in the new storage before
    /// any existing element moves. If `f` panics the array is unchanged.
    pub fn emplace_back_with<F>(&mut self, f: F) -> Result<&mut T, StorageError>
    where
        F: FnOnce() -> T,
    {
        self.try_emplace_back_with(|| Ok::<T, Infallible>(f()))
            .map_err(ConstructError::into_storage)
    }

    /// Append the element produced by the fallible constructor `f`.
    ///
    /// If `f` returns `Err` the array is unchanged (length, capacity and
    /// element addresses) and the error comes back as
    /// [`ConstructError::Element`].
    pub fn try_emplace_back_with<E, F>(&mut self, f: F) -> Result<&mut T, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if self.len == self.capacity() {
            self.grow_around(self.len, f)?;
        } else {
            let value = f().map_err(ConstructError::Element)?;
            // SAFETY: len < capacity, and the slot past the live range is
            // uninitialized.
            unsafe { self.buf.slot_mut(self.len).write(value) };
            self.len += 1;
        }
        let last = self.len - 1;
        Ok(&mut self.as_mut_slice()[last])
    }

    /// Insert the element produced by `f` at `index`, shifting later
    /// elements one slot toward the tail. Returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> Result<usize, StorageError>
    where
        F: FnOnce() -> T,
    {
        self.try_emplace_with(index, || Ok::<T, Infallible>(f()))
            .map_err(ConstructError::into_storage)
    }

    /// Insert the element produced by the fallible constructor `f` at
    /// `index`. Returns `index`.
    ///
    /// - `index == len` behaves exactly like
    ///   [`try_emplace_back_with`](DynArray::try_emplace_back_with).
    /// - A full array allocates first, constructs the element at `index` in
    ///   the new storage, then relocates the prefix and the shifted suffix.
    /// - Otherwise the element is constructed before anything shifts.
    ///
    /// In every branch a failing `f` leaves the array unchanged. A
    /// reallocating call invalidates all element addresses; a
    /// non-reallocating call moves only those from `index` on.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_emplace_with<E, F>(&mut self, index: usize, f: F) -> Result<usize, ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        assert!(
            index <= self.len,
            "insertion index (is {index}) should be <= len (is {})",
            self.len
        );
        if index == self.len {
            self.try_emplace_back_with(f)?;
            return Ok(index);
        }
        if self.len == self.capacity() {
            self.grow_around(index, f)?;
            return Ok(index);
        }
        let scratch = f().map_err(ConstructError::Element)?;
        // SAFETY: index < len < capacity. Slots [index, len) are live and
        // move one slot up into [index + 1, len + 1), which is in bounds;
        // slot `index` is then logically uninitialized and receives the
        // scratch value.
        unsafe {
            let at = self.buf.slot_mut(index);
            ptr::copy(at, at.add(1), self.len - index);
            at.write(scratch);
        }
        self.len += 1;
        Ok(index)
    }

    /// Insert `value` at `index`. Returns `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, StorageError> {
        self.emplace_with(index, || value)
    }

    /// Insert a clone of `value` at `index`. Returns `index`.
    ///
    /// The clone runs after any reallocation; if it panics the array is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_clone(&mut self, index: usize, value: &T) -> Result<usize, StorageError>
    where
        T: Clone,
    {
        self.emplace_with(index, || value.clone())
    }

    /// Remove and return the element at `index`, shifting later elements one
    /// slot toward the front.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index (is {index}) should be < len (is {})",
            self.len
        );
        // SAFETY: index < len. The element is read out, then the live tail
        // (index, len) moves down over it; the last slot ends up logically
        // uninitialized and leaves the live range.
        unsafe {
            let at = self.buf.slot_mut(index);
            let value = at.read();
            ptr::copy(at.add(1), at, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drop the element at `index`, shifting later elements one slot toward
    /// the front. Returns `index`, now the position of the following element
    /// (or the end).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Reallocate at the grown capacity with the new element at `index`.
    ///
    /// Order matters: allocate, construct into the fresh region, relocate,
    /// then adopt. Every failure point comes before the adopt, and until
    /// then the fresh region is a local that releases itself on the way out.
    fn grow_around<E, F>(&mut self, index: usize, f: F) -> Result<(), ConstructError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        debug_assert!(index <= self.len);
        let mut fresh: RawBuffer<T> = RawBuffer::with_capacity(growth::next_capacity(self.len)?)?;
        let value = f().map_err(ConstructError::Element)?;
        // SAFETY: fresh has at least len + 1 uninitialized slots. The old
        // prefix [0, index) lands in [0, index), the old suffix
        // [index, len) in [index + 1, len + 1), and `index` holds the new
        // element. After the swap the old region's slots are logically
        // uninitialized and it is released without dropping them.
        unsafe {
            fresh.slot_mut(index).write(value);
            relocate(self.buf.slot(0), fresh.slot_mut(0), index);
            relocate(
                self.buf.slot(index),
                fresh.slot_mut(index + 1),
                self.len - index,
            );
        }
        self.buf.swap(&mut fresh);
        self.len += 1;
        Ok(())
    }
}
