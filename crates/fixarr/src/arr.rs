//! The fixed-length array.
//!
//! [`Arr`] owns one block holding exactly `len` live elements, or no block
//! at all when `len == 0`. Its length only changes through whole-container
//! assignment:
//!
//! - **Different length:** the new block is allocated first, then the old
//!   elements are destroyed and the old block released, then the new block
//!   is populated. An allocation failure leaves the array untouched.
//! - **Same length:** the old elements are destroyed in place and the block
//!   is reused without allocating.
//!
//! Population runs under a high-water-mark guard. If an element
//! constructor panics, the slots built so far are destroyed, the block is
//! released, and the array is left empty: nothing leaks and no dead slot is
//! ever observable. Copy-assignment ([`Arr::copy_assign`], `clone_from`)
//! builds a full temporary first and swaps it in, so it leaves the target
//! untouched on failure.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use fixarr_core::{Allocator, ArrError, Global};

use crate::cursor::{Cursor, CursorMut};
use crate::iter::{Iter, IterMut};
use crate::raw::{self, Fill};
use crate::source::{Assigned, RangeSource};
use crate::uninit::UninitArr;

/// A fixed-length, heap-allocated array whose storage is managed through an
/// injected [`Allocator`].
pub struct Arr<T, A: Allocator<T> = Global> {
    ptr: Option<NonNull<T>>,
    len: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: `Arr` owns its elements exclusively, like `Box<[T]>`.
unsafe impl<T: Send, A: Allocator<T> + Send> Send for Arr<T, A> {}
// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: Allocator<T> + Sync> Sync for Arr<T, A> {}

impl<T> Arr<T> {
    /// An empty array. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// `n` default-constructed elements.
    pub fn with_len(n: usize) -> Result<Self, ArrError>
    where
        T: Default,
    {
        Self::with_len_in(n, Global)
    }

    /// Storage for `n` elements with none of them constructed yet.
    pub fn uninit(n: usize) -> Result<UninitArr<T>, ArrError> {
        Self::uninit_in(n, Global)
    }

    /// `n` copies of `value`.
    pub fn filled(n: usize, value: T) -> Result<Self, ArrError>
    where
        T: Clone,
    {
        Self::filled_in(n, value, Global)
    }

    /// A copy of every element of `src`.
    pub fn from_slice(src: &[T]) -> Result<Self, ArrError>
    where
        T: Clone,
    {
        Self::from_slice_in(src, Global)
    }

    /// The elements of `list`, moved in order.
    pub fn from_list<const N: usize>(list: [T; N]) -> Result<Self, ArrError> {
        Self::from_list_in(list, Global)
    }

    /// The elements of a range source. See [`Arr::assign_range`].
    pub fn from_range<S: RangeSource<T>>(source: S) -> Result<Self, ArrError> {
        Self::from_range_in(source, Global)
    }

    /// The elements of a range source, together with whether any were
    /// left out. See [`Arr::from_range_reported_in`].
    pub fn from_range_reported<S: RangeSource<T>>(
        source: S,
    ) -> Result<(Self, Assigned), ArrError> {
        Self::from_range_reported_in(source, Global)
    }
}

impl<T, A: Allocator<T>> Arr<T, A> {
    /// An empty array using `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: None,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Assemble an array from a fully populated block.
    ///
    /// # Safety
    ///
    /// `ptr` must be `None` with `len == 0`, or a block of exactly `len`
    /// live elements allocated by `alloc`.
    pub(crate) unsafe fn from_raw_parts_in(ptr: Option<NonNull<T>>, len: usize, alloc: A) -> Self {
        Self {
            ptr,
            len,
            alloc,
            _marker: PhantomData,
        }
    }

    fn from_exact_in<I: Iterator<Item = T>>(n: usize, items: I, alloc: A) -> Result<Self, ArrError> {
        let (ptr, len) = {
            let mut fill = Fill::allocate(&alloc, n)?;
            fill.extend(items);
            fill.finish()
        };
        // SAFETY: `finish` only returns once all `len` slots are live.
        Ok(unsafe { Self::from_raw_parts_in(ptr, len, alloc) })
    }

    /// `n` default-constructed elements using `alloc`.
    ///
    /// Element types without a default use [`Arr::uninit_in`] instead.
    pub fn with_len_in(n: usize, alloc: A) -> Result<Self, ArrError>
    where
        T: Default,
    {
        Self::from_exact_in(n, std::iter::repeat_with(T::default), alloc)
    }

    /// Storage for `n` elements using `alloc`, with none of them
    /// constructed.
    ///
    /// The returned [`UninitArr`] is the one place where the "every slot is
    /// live" invariant is suspended. Construct the elements through it and
    /// convert it with [`UninitArr::finish`].
    pub fn uninit_in(n: usize, alloc: A) -> Result<UninitArr<T, A>, ArrError> {
        UninitArr::allocate_in(n, alloc)
    }

    /// `n` copies of `value` using `alloc`.
    pub fn filled_in(n: usize, value: T, alloc: A) -> Result<Self, ArrError>
    where
        T: Clone,
    {
        Self::from_exact_in(n, std::iter::repeat_n(value, n), alloc)
    }

    /// A copy of every element of `src` using `alloc`.
    pub fn from_slice_in(src: &[T], alloc: A) -> Result<Self, ArrError>
    where
        T: Clone,
    {
        Self::from_exact_in(src.len(), src.iter().cloned(), alloc)
    }

    /// The elements of `list`, moved in order, using `alloc`.
    pub fn from_list_in<const N: usize>(list: [T; N], alloc: A) -> Result<Self, ArrError> {
        Self::from_exact_in(N, list.into_iter(), alloc)
    }

    /// The elements of a range source using `alloc`.
    ///
    /// A single-pass source cannot be measured before it is consumed, and
    /// the array never grows, so building from one yields an empty array.
    /// Wrap a cloneable iterator in [`MultiPass`](crate::MultiPass) to keep
    /// its elements, or use [`from_range_reported_in`](Arr::from_range_reported_in)
    /// to learn whether anything was dropped.
    pub fn from_range_in<S: RangeSource<T>>(source: S, alloc: A) -> Result<Self, ArrError> {
        let (arr, _) = Self::from_range_reported_in(source, alloc)?;
        Ok(arr)
    }

    /// The elements of a range source using `alloc`, along with the
    /// assignment outcome.
    ///
    /// A non-empty single-pass source reports [`Assigned::Truncated`].
    pub fn from_range_reported_in<S: RangeSource<T>>(
        source: S,
        alloc: A,
    ) -> Result<(Self, Assigned), ArrError> {
        let mut arr = Self::new_in(alloc);
        let outcome = arr.assign_range(source)?;
        Ok((arr, outcome))
    }

    /// An independent copy with its own block.
    pub fn try_clone(&self) -> Result<Self, ArrError>
    where
        T: Clone,
        A: Clone,
    {
        Self::from_exact_in(self.len, self.iter().cloned(), self.alloc.clone())
    }

    /// Move the contents out, leaving `self` empty.
    ///
    /// Exchanges state with a fresh empty array; no element is touched.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let mut moved = Self::new_in(self.alloc.clone());
        self.swap(&mut moved);
        moved
    }

    /// Exchange length, storage and allocator with `other` in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.alloc, &mut other.alloc);
    }

    /// Replace the contents with a copy of `source`.
    ///
    /// Copy-then-swap: on failure `self` is unchanged.
    ///
    /// The copy is built with a clone of `source`'s allocator, which `self`
    /// keeps afterwards; its previous allocator is dropped with the old
    /// contents.
    pub fn copy_assign(&mut self, source: &Self) -> Result<(), ArrError>
    where
        T: Clone,
        A: Clone,
    {
        let mut copy = source.try_clone()?;
        self.swap(&mut copy);
        Ok(())
    }

    /// Take over the contents of `source`, leaving it empty.
    ///
    /// Neither allocates nor constructs; the previous contents of `self`
    /// are destroyed.
    pub fn move_assign(&mut self, source: &mut Self) {
        self.swap(source);
        source.release();
    }

    /// Replace the contents with the elements of `list`.
    pub fn assign_list<const N: usize>(&mut self, list: [T; N]) -> Result<(), ArrError> {
        self.assign_exact(N, list.into_iter())
    }

    /// Replace the contents with a copy of `src`.
    pub fn assign_slice(&mut self, src: &[T]) -> Result<(), ArrError>
    where
        T: Clone,
    {
        self.assign_exact(src.len(), src.iter().cloned())
    }

    /// Replace the contents with `n` copies of `value`.
    pub fn assign_fill(&mut self, n: usize, value: T) -> Result<(), ArrError>
    where
        T: Clone,
    {
        self.assign_exact(n, std::iter::repeat_n(value, n))
    }

    /// Replace the contents with the elements of a range source.
    ///
    /// Multi-pass sources are counted first and then populate a block of
    /// exactly that size. Single-pass sources overwrite the existing
    /// elements in place: a shorter source shrinks the array, a longer one
    /// is cut off at the current length and reported as
    /// [`Assigned::Truncated`].
    pub fn assign_range<S: RangeSource<T>>(&mut self, source: S) -> Result<Assigned, ArrError> {
        log::debug!("assigning from {:?}-pass source", S::PASS);
        source.assign_into(self)
    }

    /// Destroy the current elements and repopulate with exactly `n` items.
    pub(crate) fn assign_exact<I: Iterator<Item = T>>(&mut self, n: usize, items: I) -> Result<(), ArrError> {
        let base = if n == self.len {
            log::debug!("reusing block of {n} elements");
            let (old, old_len) = self.detach();
            // SAFETY: the block is detached, so these elements are destroyed
            // exactly once.
            unsafe { raw::destroy_prefix(&self.alloc, old, old_len) };
            old
        } else {
            let fresh = raw::allocate_block(&self.alloc, n)?;
            log::debug!("reallocating from {} to {n} elements", self.len);
            self.release();
            fresh
        };
        // SAFETY: `base` is either the detached block with every element
        // destroyed or a fresh block, in both cases of `n` elements.
        let mut fill = unsafe { Fill::adopt(&self.alloc, base, n) };
        fill.extend(items);
        let (ptr, len) = fill.finish();
        self.ptr = ptr;
        self.len = len;
        Ok(())
    }

    pub(crate) fn assign_single_pass<I: Iterator<Item = T>>(
        &mut self,
        mut items: I,
    ) -> Result<Assigned, ArrError> {
        let mut written = 0;
        while written < self.len {
            let Some(item) = items.next() else {
                break;
            };
            self.as_mut_slice()[written] = item;
            written += 1;
        }
        if written < self.len {
            self.shrink_to(written)?;
            return Ok(Assigned::Complete);
        }
        if items.next().is_some() {
            log::warn!(
                "single-pass source outlasts array of {} elements; excess not stored",
                self.len
            );
            return Ok(Assigned::Truncated);
        }
        Ok(Assigned::Complete)
    }

    /// Keep the first `keep` elements, moving them into a block of exactly
    /// that size.
    fn shrink_to(&mut self, keep: usize) -> Result<(), ArrError> {
        debug_assert!(keep < self.len);
        let fresh = raw::allocate_block(&self.alloc, keep)?;
        let (old, old_len) = self.detach();
        log::debug!("relocating {keep} of {old_len} elements");
        if let (Some(src), Some(dst)) = (old, fresh) {
            // SAFETY: both blocks hold at least `keep` elements and are
            // distinct allocations. The moved-from slots are treated as
            // uninitialised from here on.
            unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), keep) };
        }
        self.ptr = fresh;
        self.len = keep;
        let surplus = match old {
            // SAFETY: keep < old_len, so the offset stays inside the block.
            Some(base) => Some(unsafe { base.add(keep) }),
            None => None,
        };
        // SAFETY: slots `keep..old_len` are still live and owned by nobody
        // else; the first `keep` were moved out above.
        unsafe {
            raw::destroy_prefix(&self.alloc, surplus, old_len - keep);
            raw::release_block(&self.alloc, old, old_len);
        }
        Ok(())
    }

    /// Take the block out, leaving `self` empty. The caller owns whatever
    /// the block holds.
    fn detach(&mut self) -> (Option<NonNull<T>>, usize) {
        (self.ptr.take(), mem::take(&mut self.len))
    }

    /// Destroy every element and release the block, leaving `self` empty.
    fn release(&mut self) {
        let (base, len) = self.detach();
        // SAFETY: a detached block holds exactly `len` live elements from
        // `self.alloc`.
        unsafe {
            raw::destroy_prefix(&self.alloc, base, len);
            raw::release_block(&self.alloc, base, len);
        }
    }

    fn base(&self) -> NonNull<T> {
        self.ptr.unwrap_or(NonNull::dangling())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements (and therefore no block).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest length an array with this allocator can have.
    pub fn max_size(&self) -> usize {
        raw::max_size(&self.alloc)
    }

    /// The allocator backing this array.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Pointer to the first element, or null when the array is empty.
    pub fn as_ptr(&self) -> *const T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null(),
        }
    }

    /// Mutable pointer to the first element, or null when the array is
    /// empty.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        match self.ptr {
            Some(ptr) => ptr.as_ptr(),
            None => ptr::null_mut(),
        }
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the block holds `len` live elements; an empty array uses
        // a dangling, aligned pointer with length 0.
        unsafe { std::slice::from_raw_parts(self.base().as_ptr(), self.len) }
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.base().as_ptr(), self.len) }
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T, ArrError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArrError::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrError::OutOfRange { index, len })
    }

    /// Access without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Arr::len).
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        // SAFETY: forwarded from the caller.
        unsafe { &*self.base().as_ptr().add(index) }
    }

    /// Mutable access without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Arr::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: forwarded from the caller.
        unsafe { &mut *self.base().as_ptr().add(index) }
    }

    /// The first element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn front(&self) -> &T {
        match self.as_slice().first() {
            Some(first) => first,
            None => panic!("front() called on an empty array"),
        }
    }

    /// The last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn back(&self) -> &T {
        match self.as_slice().last() {
            Some(last) => last,
            None => panic!("back() called on an empty array"),
        }
    }

    /// The first element, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn front_mut(&mut self) -> &mut T {
        match self.as_mut_slice().first_mut() {
            Some(first) => first,
            None => panic!("front_mut() called on an empty array"),
        }
    }

    /// The last element, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn back_mut(&mut self) -> &mut T {
        match self.as_mut_slice().last_mut() {
            Some(last) => last,
            None => panic!("back_mut() called on an empty array"),
        }
    }

    /// Cursor at the first element.
    ///
    /// For zero-sized `T` every cursor shares one address, so `begin()` and
    /// `end()` coincide; use [`iter`](Arr::iter) to walk such arrays.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::from_ptr(self.base().as_ptr())
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        self.begin() + self.len as isize
    }

    /// Mutable `(begin, end)` cursors.
    pub fn cursors_mut(&mut self) -> (CursorMut<'_, T>, CursorMut<'_, T>) {
        let begin = CursorMut::from_ptr(self.base().as_ptr());
        (begin, begin + self.len as isize)
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.begin(), self.len)
    }

    /// Iterate front to back with mutable access.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let len = self.len;
        let (begin, _) = self.cursors_mut();
        IterMut::new(begin, len)
    }
}

impl<T, A: Allocator<T>> Drop for Arr<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Clone, A: Allocator<T> + Clone> Clone for Arr<T, A> {
    /// # Panics
    ///
    /// Panics if storage for the copy cannot be allocated.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("{err}"),
        }
    }

    /// Copy-then-swap through [`Arr::copy_assign`]; `self` ends up with a
    /// clone of `source`'s allocator.
    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.copy_assign(source) {
            panic!("{err}");
        }
    }
}

impl<T, A: Allocator<T> + Default> Default for Arr<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, const N: usize> From<[T; N]> for Arr<T> {
    /// # Panics
    ///
    /// Panics if storage cannot be allocated.
    fn from(list: [T; N]) -> Self {
        match Self::from_list(list) {
            Ok(arr) => arr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, A: Allocator<T>> Deref for Arr<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator<T>> DerefMut for Arr<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator<T>> AsRef<[T]> for Arr<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator<T>> AsMut<[T]> for Arr<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a Arr<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a mut Arr<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixarr_test_utils::{CountingAllocator, NoDefault, Tracked};

    #[test]
    fn empty_array_has_no_block() {
        let arr: Arr<u32> = Arr::new();
        assert!(arr.is_empty());
        assert_eq!(arr.len(), 0);
        assert!(arr.as_ptr().is_null());
        assert_eq!(arr.begin(), arr.end());
        assert_eq!(arr.iter().count(), 0);
    }

    #[test]
    fn empty_construction_does_not_allocate() {
        let alloc = CountingAllocator::new();
        let arr: Arr<String, _> = Arr::new_in(alloc.clone());
        drop(arr);
        assert_eq!(alloc.stats().allocations, 0);
        assert_eq!(alloc.stats().deallocations, 0);
    }

    #[test]
    fn with_len_default_constructs_every_slot() {
        let alloc = CountingAllocator::new();
        let arr = Arr::<String, _>::with_len_in(4, alloc.clone()).unwrap();
        assert_eq!(arr.len(), 4);
        assert!(arr.iter().all(String::is_empty));
        assert_eq!(alloc.stats().constructs, 4);
    }

    #[test]
    fn with_len_zero_is_empty() {
        let arr = Arr::<u8>::with_len(0).unwrap();
        assert!(arr.is_empty());
        assert!(arr.as_ptr().is_null());
    }

    #[test]
    fn uninit_supports_types_without_default() {
        let mut slots = Arr::<NoDefault>::uninit(3).unwrap();
        for i in 0..3 {
            slots.push(NoDefault::new(i)).unwrap();
        }
        let arr = slots.finish().ok().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[2], NoDefault::new(2));
    }

    #[test]
    fn filled_copies_value() {
        let arr = Arr::filled(3, "x".to_string()).unwrap();
        assert_eq!(arr, ["x", "x", "x"].map(String::from));
    }

    #[test]
    fn from_list_moves_elements_in_order() {
        let arr = Arr::from_list([3, 1, 2]).unwrap();
        assert_eq!(arr.as_slice(), [3, 1, 2]);
        let converted: Arr<i32> = [4, 5].into();
        assert_eq!(converted, [4, 5]);
    }

    #[test]
    fn checked_and_unchecked_agree() {
        let arr = Arr::from_list([10, 20, 30]).unwrap();
        for i in 0..arr.len() {
            assert_eq!(arr.at(i).unwrap(), unsafe { arr.get_unchecked(i) });
        }
    }

    #[test]
    fn checked_access_reports_out_of_range() {
        let mut arr = Arr::from_list([1, 2]).unwrap();
        assert_eq!(arr.at(2), Err(ArrError::OutOfRange { index: 2, len: 2 }));
        assert_eq!(
            arr.at_mut(usize::MAX),
            Err(ArrError::OutOfRange {
                index: usize::MAX,
                len: 2
            })
        );
        *arr.at_mut(1).unwrap() = 7;
        assert_eq!(arr, [1, 7]);
    }

    #[test]
    fn unchecked_mut_writes_through() {
        let mut arr = Arr::from_list([1, 2, 3]).unwrap();
        unsafe { *arr.get_unchecked_mut(1) = 20 };
        assert_eq!(arr, [1, 20, 3]);
    }

    #[test]
    fn front_and_back() {
        let mut arr = Arr::from_list([1, 2, 3]).unwrap();
        assert_eq!(*arr.front(), 1);
        assert_eq!(*arr.back(), 3);
        *arr.front_mut() = 10;
        *arr.back_mut() = 30;
        assert_eq!(arr, [10, 2, 30]);
    }

    #[test]
    #[should_panic(expected = "front() called on an empty array")]
    fn front_on_empty_panics() {
        let arr: Arr<i32> = Arr::new();
        let _ = arr.front();
    }

    #[test]
    fn cursor_walk_round_trips() {
        let arr = Arr::from_list([1, 2, 3, 4]).unwrap();
        let mut seen = Vec::new();
        let mut it = arr.begin();
        while it != arr.end() {
            seen.push(unsafe { *it.get() });
            it.inc();
        }
        assert_eq!(seen, [1, 2, 3, 4]);

        let mut reversed = Vec::new();
        let mut it = arr.end();
        while it != arr.begin() {
            reversed.push(unsafe { *it.dec().get() });
        }
        assert_eq!(reversed, [4, 3, 2, 1]);
        assert_eq!(arr.end() - arr.begin(), 4);
    }

    #[test]
    fn mutable_cursors_write_and_convert() {
        let mut arr = Arr::from_list([1, 2, 3]).unwrap();
        {
            let (mut it, end) = arr.cursors_mut();
            while it != end {
                unsafe { *it.get_mut() *= 2 };
                it.inc();
            }
            let read: Cursor<'_, i32> = end.into();
            assert_eq!(unsafe { *read.get_at(-1) }, 6);
        }
        assert_eq!(arr, [2, 4, 6]);
    }

    #[test]
    fn copy_is_independent() {
        let original = Arr::from_list([1, 2, 3]).unwrap();
        let mut copy = original.clone();
        copy[0] = 100;
        assert_eq!(original, [1, 2, 3]);
        assert_eq!(copy, [100, 2, 3]);
        assert_ne!(original.as_ptr(), copy.as_ptr());
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut source = Arr::from_list([1, 2, 3]).unwrap();
        let block = source.as_ptr();
        let moved = source.take();
        assert!(source.is_empty());
        assert!(source.as_ptr().is_null());
        assert_eq!(moved, [1, 2, 3]);
        assert_eq!(moved.as_ptr(), block);
    }

    #[test]
    fn move_assign_adopts_block_and_empties_source() {
        let alloc = CountingAllocator::new();
        let mut target = Arr::from_list_in([9, 9], alloc.clone()).unwrap();
        let mut source = Arr::from_list_in([1, 2, 3], alloc.clone()).unwrap();
        let block = source.as_ptr();
        let before = alloc.stats();
        target.move_assign(&mut source);
        assert_eq!(target, [1, 2, 3]);
        assert_eq!(target.as_ptr(), block);
        assert!(source.is_empty());
        let after = alloc.stats();
        assert_eq!(after.allocations, before.allocations);
        assert_eq!(after.constructs, before.constructs);
    }

    #[test]
    fn swap_exchanges_blocks_without_copying() {
        let alloc = CountingAllocator::new();
        let mut a = Arr::from_list_in([1, 2], alloc.clone()).unwrap();
        let mut b = Arr::from_list_in([3, 4, 5], alloc.clone()).unwrap();
        let (block_a, block_b) = (a.as_ptr(), b.as_ptr());
        let before = alloc.stats();
        a.swap(&mut b);
        assert_eq!(a, [3, 4, 5]);
        assert_eq!(b, [1, 2]);
        assert_eq!(a.as_ptr(), block_b);
        assert_eq!(b.as_ptr(), block_a);
        assert_eq!(alloc.stats(), before);
    }

    #[test]
    fn copy_assign_builds_temporary_then_swaps() {
        let alloc = CountingAllocator::new();
        let mut target = Arr::from_list_in([0, 0, 0], alloc.clone()).unwrap();
        let source = Arr::from_list_in([1, 2, 3], alloc.clone()).unwrap();
        let old_block = target.as_ptr();
        target.copy_assign(&source).unwrap();
        assert_eq!(target, source);
        assert_ne!(target.as_ptr(), old_block);
        assert_eq!(alloc.stats().allocations, 3);
        assert_eq!(alloc.stats().deallocations, 1);
    }

    #[test]
    fn clone_from_matches_source() {
        let mut target = Arr::from_list([1]).unwrap();
        let source = Arr::from_list([4, 5, 6]).unwrap();
        target.clone_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn assign_list_of_new_length_reallocates() {
        let alloc = CountingAllocator::new();
        let mut arr = Arr::from_list_in([1, 2, 3], alloc.clone()).unwrap();
        arr.assign_list([7, 8]).unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr, [7, 8]);
        assert_eq!(alloc.stats().allocations, 2);
        assert_eq!(alloc.stats().deallocations, 1);
    }

    #[test]
    fn assign_list_of_same_length_reuses_block() {
        let alloc = CountingAllocator::new();
        let mut arr = Arr::from_list_in([1, 2, 3], alloc.clone()).unwrap();
        let block = arr.as_ptr();
        arr.assign_list([4, 5, 6]).unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr, [4, 5, 6]);
        assert_eq!(arr.as_ptr(), block);
        assert_eq!(alloc.stats().allocations, 1);
    }

    #[test]
    fn reuse_destroys_old_elements_before_rebuilding() {
        let drops = Tracked::counter();
        let mut arr = Arr::from_list([Tracked::new(1, &drops), Tracked::new(2, &drops)]).unwrap();
        arr.assign_list([Tracked::new(3, &drops), Tracked::new(4, &drops)])
            .unwrap();
        assert_eq!(drops.get(), 2);
        assert_eq!(arr[0].value(), 3);
        drop(arr);
        assert_eq!(drops.get(), 4);
    }

    #[test]
    fn assign_slice_and_fill() {
        let mut arr = Arr::from_list([1, 2, 3]).unwrap();
        arr.assign_slice(&[9, 8, 7, 6]).unwrap();
        assert_eq!(arr, [9, 8, 7, 6]);
        arr.assign_fill(2, 5).unwrap();
        assert_eq!(arr, [5, 5]);
        arr.assign_fill(0, 1).unwrap();
        assert!(arr.is_empty());
        assert!(arr.as_ptr().is_null());
    }

    #[test]
    fn max_size_is_bounded_by_isize() {
        let bytes: Arr<u8> = Arr::new();
        assert_eq!(bytes.max_size(), isize::MAX as usize);
        let units: Arr<()> = Arr::new();
        assert_eq!(units.max_size(), isize::MAX as usize);
        let words: Arr<u64> = Arr::new();
        assert_eq!(words.max_size(), isize::MAX as usize / 8);
    }

    #[test]
    fn oversized_request_fails_without_touching_target() {
        let mut arr = Arr::from_list([1u64, 2]).unwrap();
        let err = arr.assign_fill(usize::MAX, 0).unwrap_err();
        assert!(matches!(err, ArrError::Alloc(_)));
        assert_eq!(arr, [1, 2]);
    }

    #[test]
    fn drop_destroys_every_element_and_releases() {
        let alloc = CountingAllocator::new();
        let drops = Tracked::counter();
        let arr = Arr::from_list_in(
            [Tracked::new(1, &drops), Tracked::new(2, &drops), Tracked::new(3, &drops)],
            alloc.clone(),
        )
        .unwrap();
        drop(arr);
        assert_eq!(drops.get(), 3);
        alloc.assert_balanced();
    }

    #[test]
    fn allocator_is_retrievable() {
        let alloc = CountingAllocator::new();
        let arr: Arr<u8, _> = Arr::new_in(alloc.clone());
        assert!(arr.allocator().same_ledger(&alloc));
    }

    #[test]
    fn slice_views_and_into_iterator() {
        let mut arr = Arr::from_list([3, 1, 2]).unwrap();
        arr.sort();
        let view: &[i32] = arr.as_ref();
        assert_eq!(view, [1, 2, 3]);
        for v in &mut arr {
            *v += 1;
        }
        let total: i32 = (&arr).into_iter().sum();
        assert_eq!(total, 9);
    }

    #[test]
    fn mutable_iteration_through_into_iterator() {
        let mut arr = Arr::from_list([1, 2, 3, 4]).unwrap();
        for v in &mut arr {
            *v *= 3;
        }
        assert_eq!(arr, [3, 6, 9, 12]);
        let mut it = arr.iter_mut();
        assert_eq!(it.len(), 4);
        if let Some(last) = it.next_back() {
            *last = 0;
        }
        assert_eq!(it.count(), 3);
        assert_eq!(arr, [3, 6, 9, 0]);

        let mut empty: Arr<i32> = Arr::new();
        assert_eq!((&mut empty).into_iter().count(), 0);
    }

    #[test]
    fn copy_assign_adopts_source_allocator() {
        let target_alloc = CountingAllocator::new();
        let source_alloc = CountingAllocator::new();
        let mut target = Arr::from_list_in([1], target_alloc.clone()).unwrap();
        let source = Arr::from_list_in([2, 3], source_alloc.clone()).unwrap();
        target.copy_assign(&source).unwrap();
        assert!(target.allocator().same_ledger(&source_alloc));
        assert_eq!(target, [2, 3]);
        target_alloc.assert_balanced();
        drop(target);
        drop(source);
        source_alloc.assert_balanced();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn checked_access_matches_unchecked(
                values in proptest::collection::vec(any::<i64>(), 0..64),
                index in 0usize..80,
            ) {
                let arr = Arr::from_slice(&values).unwrap();
                for i in 0..arr.len() {
                    prop_assert_eq!(arr.at(i).unwrap(), unsafe { arr.get_unchecked(i) });
                }
                if index >= values.len() {
                    prop_assert!(arr.at(index).is_err());
                } else {
                    prop_assert_eq!(*arr.at(index).unwrap(), values[index]);
                }
            }

            #[test]
            fn assignment_sequence_keeps_ledger_balanced(
                lengths in proptest::collection::vec(0usize..16, 1..12),
            ) {
                let alloc = CountingAllocator::new();
                let mut arr = Arr::<u32, _>::new_in(alloc.clone());
                for (round, &n) in lengths.iter().enumerate() {
                    arr.assign_fill(n, round as u32).unwrap();
                    prop_assert_eq!(arr.len(), n);
                    prop_assert!(arr.iter().all(|&v| v == round as u32));
                    prop_assert_eq!(arr.as_ptr().is_null(), n == 0);
                }
                drop(arr);
                let stats = alloc.stats();
                prop_assert_eq!(stats.constructs, stats.destroys);
                prop_assert_eq!(stats.allocations, stats.deallocations);
                prop_assert_eq!(stats.live_blocks, 0);
            }
        }
    }
}
