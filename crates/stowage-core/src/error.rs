//! Error types for the Stowage containers.
//!
//! Two failure sources exist: the allocator ([`StorageError`]) and the
//! element type's own construction logic, which fallible constructors
//! report through [`ConstructError`]. Programmer errors such as
//! out-of-range positions are assertions, not error values.

use std::alloc::Layout;
use std::convert::Infallible;
use std::error::Error;
use std::fmt;

/// Errors raised while acquiring raw storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The requested element count does not fit in a valid allocation
    /// (byte size above `isize::MAX`, or the growth rule overflowed).
    CapacityOverflow {
        /// Number of elements requested (saturated at `usize::MAX` when the
        /// growth rule itself overflowed).
        requested: usize,
    },
    /// The global allocator returned null for a valid layout.
    AllocFailed {
        /// The layout that could not be satisfied.
        layout: Layout,
    },
}

impl StorageError {
    /// Escalate the error the way the standard collections do.
    ///
    /// Used by trait impls (`Clone`, `Extend`, `FromIterator`) that have no
    /// error channel. An allocation failure goes through
    /// [`std::alloc::handle_alloc_error`]; an overflow panics.
    pub fn raise(self) -> ! {
        match self {
            Self::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
            Self::CapacityOverflow { requested } => {
                panic!("capacity overflow: {requested} elements requested")
            }
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements requested")
            }
            Self::AllocFailed { layout } => {
                write!(
                    f,
                    "allocation failed: {} bytes with alignment {}",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for StorageError {}

/// Errors from operations that construct an element through a fallible
/// constructor closure.
///
/// `E` is the closure's own error type. Allocation failures on the same
/// path are carried in [`ConstructError::Storage`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructError<E> {
    /// Storage for the new element could not be acquired.
    Storage(StorageError),
    /// The element constructor returned an error.
    Element(E),
}

impl<E> ConstructError<E> {
    /// The constructor's error, if that is what failed.
    pub fn into_element(self) -> Option<E> {
        match self {
            Self::Element(err) => Some(err),
            Self::Storage(_) => None,
        }
    }
}

impl ConstructError<Infallible> {
    /// Collapse an error whose constructor cannot fail.
    pub fn into_storage(self) -> StorageError {
        match self {
            Self::Storage(err) => err,
            Self::Element(never) => match never {},
        }
    }
}

impl<E> From<StorageError> for ConstructError<E> {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl<E: fmt::Display> fmt::Display for ConstructError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Element(err) => write!(f, "element construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for ConstructError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Element(err) => Some(err),
        }
    }
}
