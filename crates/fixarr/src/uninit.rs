//! Allocated storage whose elements are constructed by the caller.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};

use fixarr_core::{Allocator, ArrError, Global};

use crate::arr::Arr;
use crate::raw;

/// A block sized for `capacity` elements, filled front to back by the
/// caller.
///
/// This is the escape hatch for element types with no default value: the
/// storage exists but holds no live elements until they are pushed. Only
/// the constructed prefix is ever visible. Once every slot is live,
/// [`finish`](UninitArr::finish) turns the block into an [`Arr`] without
/// copying. Dropping an unfinished `UninitArr` destroys the constructed
/// prefix and releases the block.
pub struct UninitArr<T, A: Allocator<T> = Global> {
    ptr: Option<NonNull<T>>,
    capacity: usize,
    live: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: owns its constructed elements exclusively, like `Arr`.
unsafe impl<T: Send, A: Allocator<T> + Send> Send for UninitArr<T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: Allocator<T> + Sync> Sync for UninitArr<T, A> {}

impl<T, A: Allocator<T>> UninitArr<T, A> {
    pub(crate) fn allocate_in(capacity: usize, alloc: A) -> Result<Self, ArrError> {
        let ptr = raw::allocate_block(&alloc, capacity)?;
        Ok(Self {
            ptr,
            capacity,
            live: 0,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Number of slots in the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots constructed so far.
    pub fn initialized(&self) -> usize {
        self.live
    }

    /// Whether every slot is live.
    pub fn is_complete(&self) -> bool {
        self.live == self.capacity
    }

    /// Construct `value` in the next free slot.
    ///
    /// Hands `value` back if every slot is already live.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        match self.ptr {
            Some(base) if self.live < self.capacity => {
                // SAFETY: live < capacity, so the slot is inside the block
                // and not yet constructed.
                unsafe { self.alloc.construct(base.add(self.live), value) };
                self.live += 1;
                Ok(())
            }
            _ => Err(value),
        }
    }

    /// The constructed prefix.
    pub fn initialized_slice(&self) -> &[T] {
        let base = self.ptr.unwrap_or(NonNull::dangling());
        // SAFETY: the first `live` slots are constructed.
        unsafe { std::slice::from_raw_parts(base.as_ptr(), self.live) }
    }

    /// Convert into an [`Arr`] once every slot is live.
    ///
    /// Returns `self` unchanged if some slots are still unconstructed.
    pub fn finish(self) -> Result<Arr<T, A>, Self> {
        if !self.is_complete() {
            return Err(self);
        }
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the allocator is moved out
        // exactly once.
        let alloc = unsafe { ptr::read(&this.alloc) };
        // SAFETY: every one of the `capacity` slots is live.
        Ok(unsafe { Arr::from_raw_parts_in(this.ptr, this.capacity, alloc) })
    }
}

impl<T, A: Allocator<T>> Drop for UninitArr<T, A> {
    fn drop(&mut self) {
        // SAFETY: exactly `live` slots are constructed in a block of
        // `capacity` elements from `alloc`.
        unsafe {
            raw::destroy_prefix(&self.alloc, self.ptr, self.live);
            raw::release_block(&self.alloc, self.ptr, self.capacity);
        }
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for UninitArr<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UninitArr")
            .field("capacity", &self.capacity)
            .field("initialized", &self.initialized_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixarr_test_utils::{CountingAllocator, NoDefault, Tracked};

    #[test]
    fn fill_then_finish() {
        let mut slots = Arr::<NoDefault>::uninit(2).unwrap();
        assert_eq!(slots.capacity(), 2);
        assert_eq!(slots.initialized(), 0);
        assert!(slots.initialized_slice().is_empty());
        slots.push(NoDefault::new(1)).unwrap();
        assert!(!slots.is_complete());
        slots.push(NoDefault::new(2)).unwrap();
        assert!(slots.is_complete());
        assert_eq!(slots.push(NoDefault::new(3)), Err(NoDefault::new(3)));
        let arr = slots.finish().ok().unwrap();
        assert_eq!(arr, [NoDefault::new(1), NoDefault::new(2)]);
    }

    #[test]
    fn unfinished_handle_is_returned() {
        let mut slots = Arr::<NoDefault>::uninit(3).unwrap();
        slots.push(NoDefault::new(7)).unwrap();
        let slots = slots.finish().unwrap_err();
        assert_eq!(slots.initialized_slice(), [NoDefault::new(7)]);
    }

    #[test]
    fn zero_capacity_finishes_empty() {
        let slots = Arr::<NoDefault>::uninit(0).unwrap();
        assert!(slots.is_complete());
        let arr = slots.finish().ok().unwrap();
        assert!(arr.is_empty());
    }

    #[test]
    fn dropping_unfinished_handle_cleans_up() {
        let alloc = CountingAllocator::new();
        let drops = Tracked::counter();
        {
            let mut slots = Arr::uninit_in(4, alloc.clone()).unwrap();
            slots.push(Tracked::new(1, &drops)).unwrap();
            slots.push(Tracked::new(2, &drops)).unwrap();
        }
        assert_eq!(drops.get(), 2);
        alloc.assert_balanced();
    }

    #[test]
    fn finished_array_owns_block() {
        let alloc = CountingAllocator::new();
        let mut slots = Arr::uninit_in(2, alloc.clone()).unwrap();
        slots.push(5u16).unwrap();
        slots.push(6u16).unwrap();
        let arr = slots.finish().ok().unwrap();
        assert_eq!(alloc.stats().live_blocks, 1);
        drop(arr);
        alloc.assert_balanced();
    }
}
