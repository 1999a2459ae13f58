//! Raw, uninitialized element storage.
//!
//! [`RawBuffer`] owns one contiguous allocation sized for a fixed number of
//! `T` slots. It never constructs or drops elements: which slots are live
//! is tracked by the container built on top of it. This crate is one of
//! two that may contain `unsafe` code (along with `stowage-array`).
//!
//! # Invariant
//!
//! ```text
//! RawBuffer<T>
//! ├── empty:     dangling sentinel, capacity 0, allocator never called
//! └── allocated: ptr owns `capacity` aligned, uninitialized T slots
//! ```
//!
//! Zero-sized `T` is always "allocated" without touching the allocator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod buffer;

pub use buffer::RawBuffer;
pub use stowage_core::StorageError;
