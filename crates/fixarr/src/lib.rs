//! Fixed-length, allocator-aware arrays with random-access cursors.
//!
//! [`Arr`] owns a single contiguous block sized at construction. It never
//! grows or shrinks in place; every change of length is a full
//! reassignment that either reuses the block (same length) or swaps in a
//! freshly populated one. All raw memory and element lifecycle operations
//! go through an [`Allocator`], [`Global`] by default.
//!
//! - [`Arr`]: construction, assignment, swap and element access.
//! - [`Cursor`] / [`CursorMut`]: pointer-like positions with random-access
//!   arithmetic, paired as `[begin, end)`.
//! - [`Iter`] / [`IterMut`]: borrowing iterators over a cursor pair.
//! - [`RangeSource`]: sources for [`Arr::assign_range`], tagged
//!   [`Pass::Single`] or [`Pass::Multi`].
//! - [`UninitArr`]: storage for element types without a default value.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod arr;
mod cmp;
pub mod cursor;
mod fmt;
pub mod iter;
mod raw;
pub mod source;
mod uninit;

pub use arr::Arr;
pub use cursor::{Cursor, CursorMut};
pub use fixarr_core::{max_count, AllocError, Allocator, ArrError, Global};
pub use iter::{Iter, IterMut};
pub use source::{Assigned, MultiPass, Pass, RangeSource, SinglePass};
pub use uninit::UninitArr;
