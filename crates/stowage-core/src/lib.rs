//! Core types shared by the Stowage workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! failure vocabulary used by the storage and array layers and the single
//! growth rule every reallocating operation follows.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod growth;

pub use error::{ConstructError, StorageError};
