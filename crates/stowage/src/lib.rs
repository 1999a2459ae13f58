//! Stowage: a growable array with explicit storage and failure guarantees.
//!
//! This is the top-level facade crate. It re-exports the public API from
//! the workspace sub-crates so that users need only a single dependency:
//!
//! ```toml
//! [dependencies]
//! stowage = "0.1"
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use stowage::DynArray;
//!
//! let mut array = DynArray::new();
//! for v in [1, 2, 3] {
//!     array.push_back(v).unwrap();
//! }
//! array.insert(1, 9).unwrap();
//! array.erase(0);
//! array.pop_back();
//! assert_eq!(array, [9, 2]);
//! assert!(array.capacity() >= 3);
//! ```
//!
//! # Module overview
//!
//! | Module | Source crate | Contents |
//! |--------|-------------|----------|
//! | [`types`] | `stowage-core` | `StorageError`, `ConstructError`, growth rule |
//! | [`raw`] | `stowage-raw` | `RawBuffer`, the uninitialized storage owner |
//! | [`array`] | `stowage-array` | `DynArray`, `IntoIter` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error types and the growth rule (`stowage-core`).
///
/// [`types::StorageError`] covers allocation, [`types::ConstructError`]
/// wraps failures of fallible element constructors, and
/// [`types::growth::next_capacity`] is the capacity rule every reallocating
/// operation follows.
pub use stowage_core as types;

/// Raw, uninitialized storage (`stowage-raw`).
///
/// [`raw::RawBuffer`] allocates and releases slots but never constructs or
/// drops elements.
pub use stowage_raw as raw;

/// The dynamic array (`stowage-array`).
///
/// [`array::DynArray`] and its owning iterator [`array::IntoIter`].
pub use stowage_array as array;

/// Common imports for typical Stowage usage.
///
/// ```rust
/// use stowage::prelude::*;
/// ```
pub mod prelude {
    pub use stowage_array::DynArray;
    pub use stowage_core::{ConstructError, StorageError};
}

pub use stowage_array::{DynArray, IntoIter};
pub use stowage_core::{ConstructError, StorageError};
pub use stowage_raw::RawBuffer;
