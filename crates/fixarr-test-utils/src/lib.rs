//! Test utilities for fixarr development.
//!
//! Provides an instrumented allocator ([`CountingAllocator`]) that keeps a
//! ledger of every block and element it has handed out and can be told to
//! fail deterministically, plus element fixtures for observing drops and
//! injecting panics.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod alloc;
pub mod fixtures;

pub use alloc::{AllocStats, CountingAllocator, CountingConfig};
pub use fixtures::{CloneBomb, NoDefault, Tracked};
