//! Random-access cursors over array storage.
//!
//! A cursor is a raw address into an [`Arr`](crate::Arr)'s block (or one
//! past its end) tagged with the lifetime of the borrow it came from.
//! Arithmetic and comparison are always safe: offsets use wrapping pointer
//! arithmetic and comparisons look only at addresses. Dereferencing is
//! `unsafe`, with the same contract as dereferencing a raw pointer.
//!
//! [`CursorMut`] converts into [`Cursor`]; the reverse conversion does not
//! exist, and [`Cursor`] exposes no way to mutate what it points at.

#![allow(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Signed element distance between two addresses.
///
/// Zero-sized elements share one address, so their distance is always 0.
fn distance<T>(to: *const T, from: *const T) -> isize {
    let size = std::mem::size_of::<T>();
    if size == 0 {
        return 0;
    }
    (to as usize).wrapping_sub(from as usize) as isize / size as isize
}

/// Read-only random-access cursor.
pub struct Cursor<'a, T> {
    ptr: *const T,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn from_ptr(ptr: *const T) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// The address this cursor points at.
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Borrow the element under the cursor.
    ///
    /// # Safety
    ///
    /// The cursor must point at a live element of the array it came from,
    /// i.e. lie in `[begin, end)`.
    pub unsafe fn get(&self) -> &'a T {
        // SAFETY: forwarded from the caller.
        unsafe { &*self.ptr }
    }

    /// Borrow the element `n` positions away.
    ///
    /// # Safety
    ///
    /// `self + n` must lie in `[begin, end)` of the originating array.
    pub unsafe fn get_at(&self, n: isize) -> &'a T {
        // SAFETY: forwarded from the caller.
        unsafe { &*self.ptr.wrapping_offset(n) }
    }

    /// Step forward one element and return the moved cursor.
    pub fn inc(&mut self) -> &mut Self {
        self.ptr = self.ptr.wrapping_add(1);
        self
    }

    /// Step back one element and return the moved cursor.
    pub fn dec(&mut self) -> &mut Self {
        self.ptr = self.ptr.wrapping_sub(1);
        self
    }

    /// Step forward one element, returning the position before the step.
    pub fn post_inc(&mut self) -> Self {
        let before = *self;
        self.inc();
        before
    }

    /// Step back one element, returning the position before the step.
    pub fn post_dec(&mut self) -> Self {
        let before = *self;
        self.dec();
        before
    }
}

/// Mutable random-access cursor.
pub struct CursorMut<'a, T> {
    ptr: *mut T,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn from_ptr(ptr: *mut T) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// The address this cursor points at.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Borrow the element under the cursor.
    ///
    /// # Safety
    ///
    /// The cursor must lie in `[begin, end)` of the array it came from, and
    /// no mutable borrow of the same element may be alive.
    pub unsafe fn get(&self) -> &'a T {
        // SAFETY: forwarded from the caller.
        unsafe { &*self.ptr }
    }

    /// Mutably borrow the element under the cursor.
    ///
    /// # Safety
    ///
    /// The cursor must lie in `[begin, end)` of the array it came from, and
    /// no other borrow of the same element may be alive while the returned
    /// reference is.
    pub unsafe fn get_mut(&self) -> &'a mut T {
        // SAFETY: forwarded from the caller.
        unsafe { &mut *self.ptr }
    }

    /// Mutably borrow the element `n` positions away.
    ///
    /// # Safety
    ///
    /// Same contract as [`get_mut`](CursorMut::get_mut) for `self + n`.
    pub unsafe fn get_at_mut(&self, n: isize) -> &'a mut T {
        // SAFETY: forwarded from the caller.
        unsafe { &mut *self.ptr.wrapping_offset(n) }
    }

    /// Step forward one element and return the moved cursor.
    pub fn inc(&mut self) -> &mut Self {
        self.ptr = self.ptr.wrapping_add(1);
        self
    }

    /// Step back one element and return the moved cursor.
    pub fn dec(&mut self) -> &mut Self {
        self.ptr = self.ptr.wrapping_sub(1);
        self
    }

    /// Step forward one element, returning the position before the step.
    pub fn post_inc(&mut self) -> Self {
        let before = *self;
        self.inc();
        before
    }

    /// Step back one element, returning the position before the step.
    pub fn post_dec(&mut self) -> Self {
        let before = *self;
        self.dec();
        before
    }
}

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T>) -> Self {
        Cursor::from_ptr(cursor.ptr)
    }
}

// Both cursor types share the same value semantics; the impls are generated
// once per type so neither needs bounds on `T`.
macro_rules! cursor_impls {
    ($cursor:ident) => {
        impl<T> Clone for $cursor<'_, T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $cursor<'_, T> {}

        impl<T> PartialEq for $cursor<'_, T> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.ptr, other.ptr)
            }
        }

        impl<T> Eq for $cursor<'_, T> {}

        impl<T> PartialOrd for $cursor<'_, T> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<T> Ord for $cursor<'_, T> {
            fn cmp(&self, other: &Self) -> Ordering {
                (self.ptr as usize).cmp(&(other.ptr as usize))
            }
        }

        impl<T> fmt::Debug for $cursor<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($cursor)).field(&self.ptr).finish()
            }
        }

        impl<T> AddAssign<isize> for $cursor<'_, T> {
            fn add_assign(&mut self, n: isize) {
                self.ptr = self.ptr.wrapping_offset(n);
            }
        }

        impl<T> SubAssign<isize> for $cursor<'_, T> {
            fn sub_assign(&mut self, n: isize) {
                self.ptr = self.ptr.wrapping_offset(n.wrapping_neg());
            }
        }

        impl<T> Add<isize> for $cursor<'_, T> {
            type Output = Self;

            fn add(mut self, n: isize) -> Self {
                self += n;
                self
            }
        }

        impl<'a, T> Add<$cursor<'a, T>> for isize {
            type Output = $cursor<'a, T>;

            fn add(self, cursor: $cursor<'a, T>) -> $cursor<'a, T> {
                cursor + self
            }
        }

        impl<T> Sub<isize> for $cursor<'_, T> {
            type Output = Self;

            fn sub(mut self, n: isize) -> Self {
                self -= n;
                self
            }
        }

        impl<T> Sub for $cursor<'_, T> {
            type Output = isize;

            fn sub(self, origin: Self) -> isize {
                distance(self.ptr as *const T, origin.ptr as *const T)
            }
        }
    };
}

cursor_impls!(Cursor);
cursor_impls!(CursorMut);
