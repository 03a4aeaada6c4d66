//! The allocator capability.
//!
//! Containers never touch the system allocator directly. Every raw memory
//! operation (block allocation, block release, element construction and
//! element destruction) is routed through an [`Allocator`], so a test
//! allocator can observe and fail each step.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::AllocError;

/// Largest element count a block of `T` may hold.
///
/// Bounded by `isize::MAX` bytes, the limit for any single Rust allocation.
/// Zero-sized types are only bounded by the count itself.
pub const fn max_count<T>() -> usize {
    let size = std::mem::size_of::<T>();
    if size == 0 {
        usize::MAX
    } else {
        isize::MAX as usize / size
    }
}

/// Supplies raw storage and element lifecycle for blocks of `T`.
///
/// # Safety
///
/// Implementors must return from [`allocate`](Allocator::allocate) a
/// pointer that is aligned for `T`, valid for reads and writes of `n`
/// elements, and not aliased by any other live block until it is handed
/// back to [`deallocate`](Allocator::deallocate) with the same `n`.
/// For zero-sized `T` or `n == 0` a dangling, well-aligned pointer is
/// acceptable.
pub unsafe trait Allocator<T> {
    /// Allocate uninitialised storage for `n` elements.
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError>;

    /// Release a block previously returned by [`allocate`](Allocator::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on this allocator (or a clone of
    /// it) with the same `n`, and must not have been released already. No
    /// element in the block may still be live.
    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize);

    /// Construct `value` in the uninitialised slot `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must point into a block from this allocator and must not hold
    /// a live element.
    unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        // SAFETY: caller guarantees slot is valid and uninitialised.
        unsafe { slot.as_ptr().write(value) }
    }

    /// Destroy the live element at `slot`, leaving it uninitialised.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live element that is not used afterwards.
    unsafe fn destroy(&self, slot: NonNull<T>) {
        // SAFETY: caller guarantees slot holds a live element.
        unsafe { slot.as_ptr().drop_in_place() }
    }

    /// Largest element count this allocator will accept.
    fn max_size(&self) -> usize {
        max_count::<T>()
    }
}

/// The system allocator.
///
/// Stateless; every instance can release blocks allocated by any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

fn layout_for<T>(n: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow {
        requested: n,
        max: max_count::<T>(),
    })
}

// SAFETY: blocks come straight from `std::alloc::alloc` with the layout of
// `[T; n]`; zero-sized requests get a dangling aligned pointer and are never
// passed to the system allocator.
unsafe impl<T> Allocator<T> for Global {
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = layout_for::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: layout has non-zero size.
        let raw = unsafe { std::alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(AllocError::Exhausted {
            requested: n,
            bytes: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        // The layout was valid when the block was allocated.
        let Ok(layout) = layout_for::<T>(n) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        // SAFETY: caller guarantees ptr came from `allocate(n)`.
        unsafe { std::alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout) }
    }
}
