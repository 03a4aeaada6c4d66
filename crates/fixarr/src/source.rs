//! Range sources and their traversal capability.
//!
//! [`Arr::assign_range`](crate::Arr::assign_range) forks on whether its
//! source can be traversed more than once. The capability is a compile-time
//! tag ([`RangeSource::PASS`]) chosen by the impl:
//!
//! - [`SinglePass`] wraps any iterator. Elements are written over the
//!   existing ones position by position; the array can shrink but never
//!   grow, so surplus source items are reported as
//!   [`Assigned::Truncated`].
//! - [`MultiPass`] wraps a `Clone` iterator, and slices and [`Iter`] are
//!   multi-pass natively. The source is counted first, then the array is
//!   reallocated (or its block reused when the count matches) and populated
//!   in one pass.

use fixarr_core::{Allocator, ArrError};

use crate::arr::Arr;
use crate::iter::Iter;

/// Traversal capability of a range source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// The source can be walked once and cannot be measured up front.
    Single,
    /// The source can be walked repeatedly, so its length can be counted
    /// before populating.
    Multi,
}

/// Outcome of a range assignment.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assigned {
    /// Every source element is now in the array.
    Complete,
    /// A single-pass source had more elements than the array; the excess
    /// was not stored and the leftover source was dropped undrained.
    Truncated,
}

impl Assigned {
    /// Whether source elements were left out.
    pub fn is_truncated(self) -> bool {
        matches!(self, Self::Truncated)
    }
}

/// A sequence that can replace the contents of an [`Arr`].
pub trait RangeSource<T>: Sized {
    /// Traversal capability that selects the assignment algorithm.
    const PASS: Pass;

    /// Replace the contents of `arr` with this source.
    fn assign_into<A: Allocator<T>>(self, arr: &mut Arr<T, A>) -> Result<Assigned, ArrError>;
}

/// Marks an iterator as single-pass.
#[derive(Clone, Debug)]
pub struct SinglePass<I>(pub I);

/// Marks a cloneable iterator as multi-pass.
///
/// The source is counted on a clone and then consumed, so every clone must
/// yield the same sequence.
///
/// # Panics
///
/// Assignment panics if the consuming pass yields fewer elements than the
/// counting pass did. The elements built so far are destroyed and the
/// block released first, leaving the target empty. Extra elements beyond
/// the counted length are ignored.
#[derive(Clone, Debug)]
pub struct MultiPass<I>(pub I);

impl<T, I: Iterator<Item = T>> RangeSource<T> for SinglePass<I> {
    const PASS: Pass = Pass::Single;

    fn assign_into<A: Allocator<T>>(self, arr: &mut Arr<T, A>) -> Result<Assigned, ArrError> {
        arr.assign_single_pass(self.0)
    }
}

impl<T, I: Iterator<Item = T> + Clone> RangeSource<T> for MultiPass<I> {
    const PASS: Pass = Pass::Multi;

    fn assign_into<A: Allocator<T>>(self, arr: &mut Arr<T, A>) -> Result<Assigned, ArrError> {
        let n = self.0.clone().count();
        arr.assign_exact(n, self.0)?;
        Ok(Assigned::Complete)
    }
}

impl<T: Clone> RangeSource<T> for &[T] {
    const PASS: Pass = Pass::Multi;

    fn assign_into<A: Allocator<T>>(self, arr: &mut Arr<T, A>) -> Result<Assigned, ArrError> {
        arr.assign_exact(self.len(), self.iter().cloned())?;
        Ok(Assigned::Complete)
    }
}

impl<T: Clone> RangeSource<T> for Iter<'_, T> {
    const PASS: Pass = Pass::Multi;

    fn assign_into<A: Allocator<T>>(self, arr: &mut Arr<T, A>) -> Result<Assigned, ArrError> {
        arr.assign_exact(self.len(), self.cloned())?;
        Ok(Assigned::Complete)
    }
}
