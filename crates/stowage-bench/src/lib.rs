//! Workload builders shared by the stowage benchmarks.
//!
//! - [`insert_positions`]: deterministic insertion indices via seed
//! - [`filled`]: a [`DynArray`] of `n` sequential values

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use stowage_array::DynArray;

/// Element counts exercised by every benchmark group.
pub const SIZES: [usize; 3] = [16, 1_000, 100_000];

/// Generate `n` deterministic insertion indices.
///
/// The `i`-th index is valid for an array holding `base_len + i` elements,
/// so replaying them in order never goes out of range.
pub fn insert_positions(base_len: usize, n: usize, seed: u64) -> Vec<usize> {
    (0..n)
        .map(|i| {
            let mixed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((i as u64).wrapping_mul(1442695040888963407));
            ((mixed >> 17) % (base_len + i + 1) as u64) as usize
        })
        .collect()
}

/// A [`DynArray`] holding `0..n`, built with the growth rule.
pub fn filled(n: usize) -> DynArray<u64> {
    (0..n as u64).collect()
}
