//! Capacity and length adjustment.

#![allow(unsafe_code)]

use std::convert::Infallible;

use stowage_core::{ConstructError, StorageError};
use stowage_raw::RawBuffer;

use crate::array::DynArray;
use crate::guard::TailGuard;
use crate::relocate::relocate;

impl<T> DynArray<T> {
    /// Ensure the total capacity is at least `capacity`.
    ///
    /// No-op when it already is. Otherwise allocates exactly `capacity`
    /// slots and relocates every element; on allocation failure the array
    /// is untouched.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), StorageError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let mut fresh = RawBuffer::with_capacity(capacity)?;
        // SAFETY: [0, len) are live in the old region and fresh has
        // capacity > len uninitialized slots.
        unsafe { relocate(self.buf.slot(0), fresh.slot_mut(0), self.len) };
        self.buf.swap(&mut fresh);
        Ok(())
    }

    /// Set the length to `len`, dropping surplus elements or appending
    /// `T::default()` values.
    pub fn resize(&mut self, len: usize) -> Result<(), StorageError>
    where
        T: Default,
    {
        self.resize_with(len, T::default)
    }

    /// Set the length to `len`, appending values produced by `f` when
    /// growing.
    pub fn resize_with<F>(&mut self, len: usize, mut f: F) -> Result<(), StorageError>
    where
        F: FnMut() -> T,
    {
        self.try_resize_with(len, || Ok::<T, Infallible>(f()))
            .map_err(ConstructError::into_storage)
    }

    /// Set the length to `len`, appending values from the fallible
    /// constructor `f` when growing.
    ///
    /// Growing reserves exactly `len` slots first (capacity may stay raised
    /// after a failure). If `f` fails part-way, the elements appended by
    /// this call are dropped and the original elements are left as they
    /// were.
    pub fn try_resize_with<E, F>(&mut self, len: usize, mut f: F) -> Result<(), ConstructError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.reserve(len)?;
        let start = self.len;
        let mut tail = TailGuard::new(&mut self.buf, start);
        for _ in start..len {
            tail.push(f().map_err(ConstructError::Element)?);
        }
        self.len = tail.commit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;
    use stowage_test_utils::{arm_default_fuse, Brittle, Factory, LiveCounter};

    #[test]
    fn reserve_below_capacity_keeps_addresses() {
        let mut array: DynArray<u64> = [1, 2, 3].into();
        array.reserve(16).unwrap();
        let ptr = array.as_ptr();
        array.reserve(4).unwrap();
        array.reserve(16).unwrap();
        assert_eq!(array.as_ptr(), ptr);
        assert_eq!(array.capacity(), 16);
    }

    #[test]
    fn reserve_above_capacity_keeps_values() {
        let mut array: DynArray<String> = ["x".to_string(), "y".to_string()].into();
        array.reserve(10).unwrap();
        assert_eq!(array.capacity(), 10);
        assert_eq!(array.len(), 2);
        assert_eq!(array.as_slice(), &["x", "y"]);
    }

    #[test]
    fn reserve_overflow_is_reported_and_harmless() {
        let mut array: DynArray<u64> = [1].into();
        let err = array.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, StorageError::CapacityOverflow { .. }));
        assert_eq!(array.as_slice(), &[1]);
        assert_eq!(array.capacity(), 1);
    }

    #[test]
    fn reserve_does_not_drop_relocated_elements() {
        let counter = LiveCounter::new();
        let mut array = DynArray::with_len_with(3, || counter.track(5)).unwrap();
        array.reserve(100).unwrap();
        assert_eq!(counter.live(), 3);
        drop(array);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn resize_shrinks_and_grows() {
        let mut array: DynArray<i32> = [1, 2, 3, 4].into();
        array.resize(2).unwrap();
        assert_eq!(array.as_slice(), &[1, 2]);
        array.resize(5).unwrap();
        assert_eq!(array.as_slice(), &[1, 2, 0, 0, 0]);
        assert_eq!(array.capacity(), 5);
    }

    #[test]
    fn resize_to_same_length_is_noop() {
        let mut array: DynArray<i32> = [1, 2].into();
        let ptr = array.as_ptr();
        array.resize(2).unwrap();
        assert_eq!(array.as_ptr(), ptr);
        assert_eq!(array.as_slice(), &[1, 2]);
    }

    #[test]
    fn resize_shrink_drops_exactly_the_tail() {
        let counter = LiveCounter::new();
        let mut array = DynArray::with_len_with(7, || counter.track(1)).unwrap();
        array.resize_with(3, || counter.track(0)).unwrap();
        assert_eq!(counter.live(), 3);
    }

    #[test]
    fn failing_resize_unwinds_only_new_elements() {
        let counter = LiveCounter::new();
        let mut array = DynArray::with_len_with(2, || counter.track(1)).unwrap();
        let mut factory = Factory::fails_on(3);
        let result = array.try_resize_with(6, || factory.make().map(|v| counter.track(v)));
        assert!(result.is_err());
        assert_eq!(array.len(), 2);
        assert_eq!(counter.live(), 2);
        assert!(array.iter().all(|t| t.value() == 1));
    }

    #[test]
    fn panicking_default_during_resize_keeps_originals() {
        let mut array = DynArray::with_len_with(2, || Brittle::new(4)).unwrap();
        arm_default_fuse(1);
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| array.resize(5)));
        assert!(result.is_err());
        assert_eq!(array.len(), 2);
        assert_eq!(array.as_slice(), &[Brittle::new(4), Brittle::new(4)]);
        drop(array);
        assert_eq!(Brittle::live(), 0);
    }
}
