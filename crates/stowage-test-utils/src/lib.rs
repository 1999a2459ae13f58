//! Test utilities and instrumented element types for Stowage development.
//!
//! Container failure-safety is only observable through the elements, so
//! these types count their live instances and fail on demand:
//!
//! - [`LiveCounter`] / [`Tracked`]: live-instance accounting.
//! - [`Fuse`] / [`Fused`]: `Clone` panics once the fuse is spent.
//! - [`Brittle`] with [`arm_default_fuse`]: `Default` panics on demand.
//! - [`Charges`] / [`Charge`]: `Drop` panics on demand.
//! - [`Factory`]: a fallible constructor that fails on a chosen call.
//!
//! Counters are `Rc`/thread-local based: each test runs on its own thread
//! and sees its own counts.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    arm_default_fuse, disarm_default_fuse, Brittle, Charge, Charges, Factory, FactoryError, Fuse,
    Fused, LiveCounter, Tracked,
};
