//! The raw storage owner.
//!
//! Every `unsafe` block here carries a `// SAFETY:` comment and is covered
//! by the tests at the bottom of the file (run them under Miri).

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::NonNull;
use std::slice;

use stowage_core::StorageError;

/// A contiguous region of uninitialized slots for `capacity` values of `T`.
///
/// The buffer only allocates and frees bytes. It has no idea which slots
/// hold live values, so dropping it never runs `T`'s destructor; the owner
/// must drop any live elements first. Ownership moves with [`take`] and
/// [`swap`]; there is no `Clone`.
///
/// [`take`]: RawBuffer::take
/// [`swap`]: RawBuffer::swap
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: RawBuffer uniquely owns its allocation, like Box<[MaybeUninit<T>]>.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out shared views of the region.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// The empty buffer. Never allocates.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Allocate uninitialized storage for exactly `capacity` elements.
    ///
    /// A capacity of zero returns the empty buffer without calling the
    /// allocator, as does any capacity for a zero-sized `T`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::CapacityOverflow`] if `capacity` elements cannot be
    ///   described by a [`Layout`].
    /// - [`StorageError::AllocFailed`] if the allocator refuses the request.
    ///   The request is not retried.
    pub fn with_capacity(capacity: usize) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        let layout = Layout::array::<T>(capacity)
            .map_err(|_| StorageError::CapacityOverflow {
                requested: capacity,
            })?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }
        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(StorageError::AllocFailed { layout })?;
        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Number of slots in the region.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the allocator currently backs this buffer.
    pub fn is_allocated(&self) -> bool {
        self.layout().is_some()
    }

    /// Bytes of raw storage owned by this buffer.
    pub fn memory_bytes(&self) -> usize {
        self.layout().map_or(0, |layout| layout.size())
    }

    /// Pointer to the first slot. Dangling (but aligned) when empty.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot. Dangling (but aligned) when empty.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index <= capacity` must hold. `index == capacity` yields the
    /// one-past-the-end pointer, which must not be dereferenced. Checked
    /// only in debug builds.
    #[inline]
    pub unsafe fn slot(&self, index: usize) -> *const T {
        debug_assert!(
            index <= self.capacity,
            "slot {index} out of range for capacity {}",
            self.capacity
        );
        // SAFETY: index <= capacity per caller contract, so the offset stays
        // within (or one past) the allocation.
        unsafe { self.as_ptr().add(index) }
    }

    /// Mutable pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// Same contract as [`slot`](RawBuffer::slot).
    #[inline]
    pub unsafe fn slot_mut(&mut self, index: usize) -> *mut T {
        debug_assert!(
            index <= self.capacity,
            "slot {index} out of range for capacity {}",
            self.capacity
        );
        // SAFETY: index <= capacity per caller contract.
        unsafe { self.as_mut_ptr().add(index) }
    }

    /// View the whole region as possibly-uninitialized slots.
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: the region holds `capacity` slots (or is a dangling,
        // aligned pointer with zero length / zero-sized T), and
        // MaybeUninit<T> has no validity requirement.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Mutable view of the whole region as possibly-uninitialized slots.
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: as above; &mut self guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Move the allocation out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Exchange allocations with `other`. O(1), touches no elements.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    fn layout(&self) -> Option<Layout> {
        if self.capacity == 0 || mem::size_of::<T>() == 0 {
            return None;
        }
        Layout::array::<T>(self.capacity).ok()
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if let Some(layout) = self.layout() {
            // SAFETY: ptr was returned by alloc::alloc with this same layout
            // (capacity never changes after allocation).
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T> std::fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn zero_capacity_never_allocates() {
        let buf = RawBuffer::<u64>::with_capacity(0).unwrap();
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_allocated());
        assert_eq!(buf.memory_bytes(), 0);
    }

    #[test]
    fn allocates_exact_capacity() {
        let buf = RawBuffer::<u32>::with_capacity(10).unwrap();
        assert_eq!(buf.capacity(), 10);
        assert!(buf.is_allocated());
        assert_eq!(buf.memory_bytes(), 40);
        assert_eq!(buf.as_uninit_slice().len(), 10);
    }

    #[test]
    fn slots_are_aligned_for_t() {
        let buf = RawBuffer::<u128>::with_capacity(3).unwrap();
        assert_eq!(buf.as_ptr() as usize % mem::align_of::<u128>(), 0);
    }

    #[test]
    fn oversized_request_reports_overflow() {
        let result = RawBuffer::<u64>::with_capacity(usize::MAX);
        assert!(matches!(
            result,
            Err(StorageError::CapacityOverflow {
                requested: usize::MAX
            })
        ));
    }

    #[test]
    fn zero_sized_types_skip_the_allocator() {
        let buf = RawBuffer::<()>::with_capacity(1_000).unwrap();
        assert_eq!(buf.capacity(), 1_000);
        assert!(!buf.is_allocated());
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut a = RawBuffer::<u8>::with_capacity(16).unwrap();
        let ptr = a.as_ptr();
        let b = a.take();
        assert_eq!(a.capacity(), 0);
        assert!(!a.is_allocated());
        assert_eq!(b.capacity(), 16);
        assert_eq!(b.as_ptr(), ptr);
    }

    #[test]
    fn swap_exchanges_regions() {
        let mut a = RawBuffer::<u8>::with_capacity(4).unwrap();
        let mut b = RawBuffer::<u8>::new();
        let ptr = a.as_ptr();
        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 4);
        assert_eq!(b.as_ptr(), ptr);
    }

    #[test]
    fn slot_writes_are_visible_through_uninit_view() {
        let mut buf = RawBuffer::<u32>::with_capacity(4).unwrap();
        for i in 0..4 {
            // SAFETY: i < capacity.
            unsafe { buf.slot_mut(i).write(i as u32 * 10) };
        }
        let view = buf.as_uninit_slice();
        // SAFETY: every slot was written above.
        let third = unsafe { view[3].assume_init() };
        assert_eq!(third, 30);
    }

    #[test]
    fn uninit_slice_mut_writes_land_in_slots() {
        let mut buf = RawBuffer::<u16>::with_capacity(3).unwrap();
        for (i, slot) in buf.as_uninit_slice_mut().iter_mut().enumerate() {
            slot.write(i as u16 + 7);
        }
        // SAFETY: every slot was written through the view above.
        let middle = unsafe { buf.slot(1).read() };
        assert_eq!(middle, 8);
        assert!(RawBuffer::<u16>::new().as_uninit_slice_mut().is_empty());
    }

    #[test]
    fn drop_never_runs_element_destructors() {
        struct CountsDrops<'a>(&'a Cell<usize>);
        impl Drop for CountsDrops<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Cell::new(0);
        {
            let mut buf = RawBuffer::<CountsDrops<'_>>::with_capacity(2).unwrap();
            // SAFETY: slot 0 is in range and uninitialized.
            unsafe { buf.slot_mut(0).write(CountsDrops(&drops)) };
        }
        // The buffer does not know slot 0 was live.
        assert_eq!(drops.get(), 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn capacity_and_bytes_match_request(cap in 0usize..4096) {
                let buf = RawBuffer::<u16>::with_capacity(cap).unwrap();
                prop_assert_eq!(buf.capacity(), cap);
                prop_assert_eq!(buf.memory_bytes(), cap * 2);
                prop_assert_eq!(buf.is_allocated(), cap > 0);
            }
        }
    }
}
