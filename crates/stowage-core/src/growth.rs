//! The growth rule applied whenever a container runs out of room.
//!
//! Capacity starts at [`INITIAL_CAPACITY`] for an empty container and is
//! otherwise [`GROWTH_FACTOR`] times the current length. Doubling on the
//! length (not the old capacity) keeps appends amortized O(1).

use crate::error::StorageError;

/// Capacity chosen when an empty container first needs storage.
pub const INITIAL_CAPACITY: usize = 1;

/// Multiplier applied to the current length on every growth.
pub const GROWTH_FACTOR: usize = 2;

/// Capacity to allocate when a container of `len` live elements is full.
///
/// Returns [`StorageError::CapacityOverflow`] if the product does not fit
/// in `usize`; the reported request saturates at `usize::MAX`.
pub fn next_capacity(len: usize) -> Result<usize, StorageError> {
    if len == 0 {
        return Ok(INITIAL_CAPACITY);
    }
    len.checked_mul(GROWTH_FACTOR)
        .ok_or(StorageError::CapacityOverflow {
            requested: len.saturating_mul(GROWTH_FACTOR),
        })
}
