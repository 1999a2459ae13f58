//! A growable array built directly on raw storage.
//!
//! [`DynArray`] owns exactly one [`RawBuffer`] and tracks how many of its
//! slots hold live elements. All element construction, destruction and
//! relocation happens here; the buffer only hands out memory.
//!
//! # Architecture
//!
//! ```text
//! DynArray<T>
//! ├── RawBuffer<T>   (stowage-raw: allocate / release / slot pointers)
//! ├── len            (slots [0, len) live, [len, capacity) uninitialized)
//! ├── growth         (stowage-core: 1 when empty, else 2 × len)
//! └── relocate       (bitwise move into the fresh region)
//! ```
//!
//! # Failure guarantees
//!
//! | Operation | On allocation or constructor failure |
//! |---|---|
//! | `with_len*`, `try_clone`, `Clone` | strong (nothing leaks, nothing built) |
//! | `push_back`, `emplace*`, `insert*` | strong |
//! | `reserve` | strong |
//! | `resize*` (grow) | existing elements untouched; new ones unwound |
//! | `assign_from` / `clone_from` (fits in capacity) | basic |
//!
//! Constructor failures are either panics (unwinding through a drop guard)
//! or `Err` values from the `try_*` closures.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
mod assign;
mod emplace;
mod guard;
pub mod iter;
mod relocate;
mod resize;

pub use array::DynArray;
pub use iter::IntoIter;
pub use stowage_core::{ConstructError, StorageError};
pub use stowage_raw::RawBuffer;
