//! Structural comparison.
//!
//! Arrays compare by contents alone: length first for equality, then
//! element-wise lexicographic order, where a strict prefix orders first.
//! The allocator never takes part.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use fixarr_core::Allocator;

use crate::arr::Arr;

impl<T, U, A, B> PartialEq<Arr<U, B>> for Arr<T, A>
where
    T: PartialEq<U>,
    A: Allocator<T>,
    B: Allocator<U>,
{
    fn eq(&self, other: &Arr<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator<T>> Eq for Arr<T, A> {}

impl<T, U, A, const N: usize> PartialEq<[U; N]> for Arr<T, A>
where
    T: PartialEq<U>,
    A: Allocator<T>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, A> PartialEq<[U]> for Arr<T, A>
where
    T: PartialEq<U>,
    A: Allocator<T>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A> PartialEq<&[U]> for Arr<T, A>
where
    T: PartialEq<U>,
    A: Allocator<T>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, A, B> PartialOrd<Arr<T, B>> for Arr<T, A>
where
    T: PartialOrd,
    A: Allocator<T>,
    B: Allocator<T>,
{
    fn partial_cmp(&self, other: &Arr<T, B>) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator<T>> Ord for Arr<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator<T>> Hash for Arr<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
