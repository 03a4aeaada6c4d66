//! Borrowing iterators built on cursor pairs.

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;

use crate::cursor::{Cursor, CursorMut};

/// Shared iterator over an array, front to back.
///
/// Walks a `[front, back)` cursor pair. Cloning yields an independent
/// iterator over the remaining range, which makes `Iter` a multi-pass
/// source for [`Arr::assign_range`](crate::Arr::assign_range).
pub struct Iter<'a, T> {
    front: Cursor<'a, T>,
    back: Cursor<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(front: Cursor<'a, T>, len: usize) -> Self {
        Self {
            front,
            back: front + len as isize,
            remaining: len,
        }
    }

    /// Iterate the range delimited by two cursors.
    ///
    /// # Safety
    ///
    /// `first` and `last` must come from the same array, with
    /// `first <= last` and both in `[begin, end]`.
    pub unsafe fn from_cursors(first: Cursor<'a, T>, last: Cursor<'a, T>) -> Self {
        Self::new(first, (last - first).max(0) as usize)
    }

    /// Cursor at the next element to be yielded from the front.
    pub fn front_cursor(&self) -> Cursor<'a, T> {
        self.front
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: remaining > 0, so front lies inside the live range.
        Some(unsafe { self.front.post_inc().get() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: remaining > 0, so back - 1 lies inside the live range.
        Some(unsafe { self.back.dec().get() })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Mutable iterator over an array, front to back.
pub struct IterMut<'a, T> {
    front: CursorMut<'a, T>,
    back: CursorMut<'a, T>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(front: CursorMut<'a, T>, len: usize) -> Self {
        Self {
            front,
            back: front + len as isize,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: remaining > 0 and each slot is yielded exactly once.
        Some(unsafe { self.front.post_inc().get_mut() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // SAFETY: remaining > 0 and each slot is yielded exactly once.
        Some(unsafe { self.back.dec().get_mut() })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Arr;

    #[test]
    fn forward_and_reverse() {
        let arr = Arr::from_list([1, 2, 3, 4]).unwrap();
        let forward: Vec<i32> = arr.iter().copied().collect();
        assert_eq!(forward, [1, 2, 3, 4]);
        let reverse: Vec<i32> = arr.iter().rev().copied().collect();
        assert_eq!(reverse, [4, 3, 2, 1]);
    }

    #[test]
    fn meets_in_the_middle() {
        let arr = Arr::from_list(['a', 'b', 'c']).unwrap();
        let mut it = arr.iter();
        assert_eq!(it.len(), 3);
        assert_eq!(it.next(), Some(&'a'));
        assert_eq!(it.next_back(), Some(&'c'));
        assert_eq!(it.next(), Some(&'b'));
        assert_eq!(it.next_back(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn clone_is_an_independent_pass() {
        let arr = Arr::from_list([5, 6, 7]).unwrap();
        let mut it = arr.iter();
        it.next();
        let replay = it.clone();
        assert_eq!(it.count(), 2);
        assert_eq!(replay.copied().collect::<Vec<_>>(), [6, 7]);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut arr = Arr::from_list([1, 2, 3]).unwrap();
        for v in arr.iter_mut() {
            *v *= 10;
        }
        if let Some(last) = arr.iter_mut().next_back() {
            *last += 1;
        }
        assert_eq!(arr.as_slice(), [10, 20, 31]);
    }

    #[test]
    fn from_cursors_covers_subrange() {
        let arr = Arr::from_list([1, 2, 3, 4, 5]).unwrap();
        let first = arr.begin() + 1;
        let last = arr.end() - 1;
        let middle = unsafe { crate::Iter::from_cursors(first, last) };
        assert_eq!(middle.copied().collect::<Vec<_>>(), [2, 3, 4]);
    }

    #[test]
    fn zero_sized_elements_iterate_by_count() {
        let arr = Arr::from_list([(), (), ()]).unwrap();
        assert_eq!(arr.iter().count(), 3);
        assert_eq!(arr.iter().rev().count(), 3);
    }

    #[test]
    fn debug_lists_remaining() {
        let arr = Arr::from_list([1, 2]).unwrap();
        assert_eq!(format!("{:?}", arr.iter()), "[1, 2]");
    }
}
