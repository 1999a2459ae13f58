//! Moving live elements between storage regions.

#![allow(unsafe_code)]

use std::ptr;

/// Move `count` live elements from `src` into the uninitialized slots at
/// `dst`.
///
/// A Rust move is a bitwise copy that cannot fail for any `T`, so this is
/// always the move path and never needs an unwind branch. Afterwards the
/// source slots are logically uninitialized: they must not be dropped, only
/// their raw storage released.
///
/// # Safety
///
/// - `src..src + count` must hold live elements.
/// - `dst..dst + count` must be uninitialized slots in a different region.
#[inline]
pub(crate) unsafe fn relocate<T>(src: *const T, dst: *mut T, count: usize) {
    // SAFETY: forwarded to the caller.
    unsafe { ptr::copy_nonoverlapping(src, dst, count) }
}
