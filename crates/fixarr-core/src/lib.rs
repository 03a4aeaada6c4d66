//! Core types for the fixarr workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! allocator capability that every fixarr container is built on, the
//! default [`Global`] allocator, and the error types shared across the
//! workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod error;

pub use alloc::{max_count, Allocator, Global};
pub use error::{AllocError, ArrError};
