//! The array type, its constructors and observers.

#![allow(unsafe_code)]

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::{ptr, slice};

use stowage_core::{ConstructError, StorageError};
use stowage_raw::RawBuffer;

use crate::guard::TailGuard;

/// A contiguous growable array of `T`.
///
/// Slots `[0, len)` of the owned [`RawBuffer`] hold live elements; the rest
/// are uninitialized. When an operation needs more room it allocates a new
/// region (capacity `1` when empty, otherwise `2 × len`), places the new
/// element there first, relocates the old elements, and only then releases
/// the old region. A failure before the swap leaves the array untouched.
///
/// Element access goes through the slice API ([`Deref<Target = [T]>`]):
/// `get` returns `Option`, indexing panics out of range.
///
/// [`Deref<Target = [T]>`]: Deref
pub struct DynArray<T> {
    pub(crate) buf: RawBuffer<T>,
    pub(crate) len: usize,
}

impl<T> DynArray<T> {
    /// An empty array with capacity 0. Never allocates.
    pub const fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// An empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, StorageError> {
        Ok(Self {
            buf: RawBuffer::with_capacity(capacity)?,
            len: 0,
        })
    }

    /// `len` default-constructed elements in a buffer of exactly `len` slots.
    ///
    /// If `T::default` panics part-way, the elements built so far are
    /// dropped and the storage released before the panic continues.
    pub fn with_len(len: usize) -> Result<Self, StorageError>
    where
        T: Default,
    {
        Self::with_len_with(len, T::default)
    }

    /// `len` elements produced by `f`, in call order.
    pub fn with_len_with<F>(len: usize, mut f: F) -> Result<Self, StorageError>
    where
        F: FnMut() -> T,
    {
        Self::try_with_len_with(len, || Ok::<T, Infallible>(f()))
            .map_err(ConstructError::into_storage)
    }

    /// `len` elements produced by the fallible constructor `f`.
    ///
    /// On the first `Err` every element already built is dropped and the
    /// storage released; the error is returned as
    /// [`ConstructError::Element`].
    pub fn try_with_len_with<E, F>(len: usize, mut f: F) -> Result<Self, ConstructError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut array = Self::with_capacity(len)?;
        let mut tail = TailGuard::new(&mut array.buf, 0);
        for _ in 0..len {
            tail.push(f().map_err(ConstructError::Element)?);
        }
        array.len = tail.commit();
        Ok(array)
    }

    /// Move the contents out in O(1), leaving `self` empty with capacity 0.
    pub fn take(&mut self) -> Self {
        let mut taken = Self::new();
        taken.swap(self);
        taken
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        std::mem::swap(&mut self.len, &mut other.len);
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the current storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The live elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live; the pointer is non-null and
        // aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The live elements, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, with unique access through &mut self.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Drop every element from `len` on. No-op if `len >= self.len()`.
    /// Capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let dropped = self.len - len;
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: slots [len, len + dropped) were live and are no longer
        // counted.
        unsafe {
            let first = self.buf.slot_mut(len);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, dropped));
        }
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drop the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop_back on an empty DynArray");
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was live.
        unsafe { ptr::drop_in_place(self.buf.slot_mut(self.len)) };
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside the live range, so
        // reading moves ownership out exactly once.
        Some(unsafe { self.buf.slot_mut(self.len).read() })
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: [0, len) are live and dropped exactly once here; the
        // buffer then releases the raw bytes.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}
