//! Block lifecycle primitives shared by [`Arr`](crate::Arr) and
//! [`UninitArr`](crate::UninitArr).
//!
//! A block is `Option<NonNull<T>>` plus an element count: `None` iff the
//! count is zero. Every raw operation goes through the container's
//! allocator.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use fixarr_core::{AllocError, Allocator};

/// Largest element count a container may hold with `alloc`.
pub(crate) fn max_size<T, A: Allocator<T>>(alloc: &A) -> usize {
    alloc.max_size().min(isize::MAX as usize)
}

/// Allocate an uninitialised block for `n` elements (`None` when `n == 0`).
pub(crate) fn allocate_block<T, A: Allocator<T>>(
    alloc: &A,
    n: usize,
) -> Result<Option<NonNull<T>>, AllocError> {
    if n == 0 {
        return Ok(None);
    }
    let max = max_size(alloc);
    if n > max {
        return Err(AllocError::CapacityOverflow { requested: n, max });
    }
    let ptr = alloc.allocate(n)?;
    log::trace!("allocated block of {n} elements at {ptr:p}");
    Ok(Some(ptr))
}

/// Release a block of `n` elements.
///
/// # Safety
///
/// `base` must be `None`, or a block of exactly `n` elements from `alloc`
/// with no live elements left in it.
pub(crate) unsafe fn release_block<T, A: Allocator<T>>(
    alloc: &A,
    base: Option<NonNull<T>>,
    n: usize,
) {
    if let Some(ptr) = base {
        log::trace!("releasing block of {n} elements at {ptr:p}");
        // SAFETY: forwarded from the caller.
        unsafe { alloc.deallocate(ptr, n) }
    }
}

/// Destroy the first `n` elements of a block, front to back.
///
/// # Safety
///
/// The first `n` slots of `base` must hold live elements. They are
/// uninitialised afterwards.
pub(crate) unsafe fn destroy_prefix<T, A: Allocator<T>>(
    alloc: &A,
    base: Option<NonNull<T>>,
    n: usize,
) {
    let Some(base) = base else {
        return;
    };
    for i in 0..n {
        // SAFETY: i < n and the caller guarantees the prefix is live.
        unsafe { alloc.destroy(base.add(i)) }
    }
}

/// Populates a block slot by slot, tracking the high-water mark of live
/// slots.
///
/// Dropping a `Fill` (normally or while unwinding from a panicking element
/// constructor) destroys the live prefix and releases the block, so a
/// failed population never leaks and never leaves half-built storage
/// behind. [`finish`](Fill::finish) hands the block over once every slot is
/// live.
pub(crate) struct Fill<'a, T, A: Allocator<T>> {
    alloc: &'a A,
    base: Option<NonNull<T>>,
    cap: usize,
    live: usize,
}

impl<'a, T, A: Allocator<T>> Fill<'a, T, A> {
    /// Allocate a fresh block of `cap` elements to populate.
    pub(crate) fn allocate(alloc: &'a A, cap: usize) -> Result<Self, AllocError> {
        let base = allocate_block(alloc, cap)?;
        Ok(Self {
            alloc,
            base,
            cap,
            live: 0,
        })
    }

    /// Take over an existing block whose elements have all been destroyed.
    ///
    /// # Safety
    ///
    /// `base` must be `None` with `cap == 0`, or a block of exactly `cap`
    /// elements from `alloc` holding no live elements and owned by nothing
    /// else.
    pub(crate) unsafe fn adopt(alloc: &'a A, base: Option<NonNull<T>>, cap: usize) -> Self {
        Self {
            alloc,
            base,
            cap,
            live: 0,
        }
    }

    /// Construct `value` in the next free slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already live.
    pub(crate) fn push(&mut self, value: T) {
        match self.base {
            Some(base) if self.live < self.cap => {
                // SAFETY: live < cap, so the slot is inside the block and
                // has not been constructed yet.
                unsafe { self.alloc.construct(base.add(self.live), value) };
                self.live += 1;
            }
            _ => panic!("fill past the end of a block of {} elements", self.cap),
        }
    }

    /// Construct elements from `items` until the block is full or the
    /// source runs dry.
    pub(crate) fn extend<I: Iterator<Item = T>>(&mut self, items: I) {
        let remaining = self.cap - self.live;
        for item in items.take(remaining) {
            self.push(item);
        }
    }

    /// Hand over the fully populated block as `(base, len)`.
    ///
    /// # Panics
    ///
    /// Panics if some slots are still uninitialised. The guard cleans up the
    /// live prefix while unwinding.
    pub(crate) fn finish(self) -> (Option<NonNull<T>>, usize) {
        if self.live != self.cap {
            panic!(
                "source yielded {} elements but {} were expected",
                self.live, self.cap
            );
        }
        let parts = (self.base, self.cap);
        std::mem::forget(self);
        parts
    }
}

impl<T, A: Allocator<T>> Drop for Fill<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: exactly `live` slots were constructed by this guard and the
        // block holds `cap` elements from `alloc`.
        unsafe {
            destroy_prefix(self.alloc, self.base, self.live);
            release_block(self.alloc, self.base, self.cap);
        }
    }
}
