//! An allocator that records everything it does.

#![allow(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

use fixarr_core::{AllocError, Allocator, Global};
use indexmap::IndexMap;

/// Failure injection for [`CountingAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountingConfig {
    /// Number of allocations that succeed before every further request
    /// fails with [`AllocError::Exhausted`].
    ///
    /// Default: `None` (never fail).
    pub fail_after: Option<usize>,

    /// Largest element count a single request may ask for. Larger requests
    /// fail with [`AllocError::Exhausted`].
    ///
    /// Default: `None` (no cap beyond the usual `isize::MAX` bytes).
    pub max_elements: Option<usize>,
}

impl CountingConfig {
    /// Default allocation budget: unlimited.
    pub const DEFAULT_FAIL_AFTER: Option<usize> = None;

    /// Default per-request cap: none.
    pub const DEFAULT_MAX_ELEMENTS: Option<usize> = None;

    pub fn new() -> Self {
        Self {
            fail_after: Self::DEFAULT_FAIL_AFTER,
            max_elements: Self::DEFAULT_MAX_ELEMENTS,
        }
    }
}

impl Default for CountingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a [`CountingAllocator`]'s counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocStats {
    /// Successful `allocate` calls.
    pub allocations: usize,
    /// `deallocate` calls.
    pub deallocations: usize,
    /// Elements constructed through the allocator.
    pub constructs: usize,
    /// Elements destroyed through the allocator.
    pub destroys: usize,
    /// Blocks with a non-zero byte size that have not been released.
    pub live_blocks: usize,
}

#[derive(Debug)]
struct Ledger {
    config: CountingConfig,
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    constructs: Cell<usize>,
    destroys: Cell<usize>,
    /// Live blocks: address -> size in bytes.
    blocks: RefCell<IndexMap<usize, usize>>,
}

/// Allocator backed by [`Global`] that counts every block and element
/// operation.
///
/// Clones share one ledger, so a test keeps a clone and inspects it after
/// the container under test is gone. Releasing a block that the ledger
/// does not know about, or with the wrong size, panics.
#[derive(Clone, Debug)]
pub struct CountingAllocator {
    ledger: Rc<Ledger>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::with_config(CountingConfig::new())
    }

    pub fn with_config(config: CountingConfig) -> Self {
        Self {
            ledger: Rc::new(Ledger {
                config,
                allocations: Cell::new(0),
                deallocations: Cell::new(0),
                constructs: Cell::new(0),
                destroys: Cell::new(0),
                blocks: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// An allocator whose first `n` allocations succeed and whose later
    /// ones fail.
    pub fn failing_after(n: usize) -> Self {
        Self::with_config(CountingConfig {
            fail_after: Some(n),
            ..CountingConfig::new()
        })
    }

    pub fn stats(&self) -> AllocStats {
        let ledger = &self.ledger;
        AllocStats {
            allocations: ledger.allocations.get(),
            deallocations: ledger.deallocations.get(),
            constructs: ledger.constructs.get(),
            destroys: ledger.destroys.get(),
            live_blocks: ledger.blocks.borrow().len(),
        }
    }

    /// Addresses of live blocks, oldest first.
    pub fn live_addresses(&self) -> Vec<usize> {
        self.ledger.blocks.borrow().keys().copied().collect()
    }

    /// Whether `other` shares this allocator's ledger.
    pub fn same_ledger(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ledger, &other.ledger)
    }

    /// Panic unless every block was released and every constructed element
    /// destroyed.
    pub fn assert_balanced(&self) {
        let stats = self.stats();
        assert_eq!(
            stats.allocations, stats.deallocations,
            "unbalanced blocks: {stats:?}"
        );
        assert_eq!(
            stats.constructs, stats.destroys,
            "unbalanced elements: {stats:?}"
        );
        assert_eq!(stats.live_blocks, 0, "leaked blocks: {stats:?}");
    }

    fn refuse(&self, n: usize, bytes: usize) -> Option<AllocError> {
        let config = &self.ledger.config;
        let over_budget = config
            .fail_after
            .is_some_and(|budget| self.ledger.allocations.get() >= budget);
        let over_cap = config.max_elements.is_some_and(|cap| n > cap);
        (over_budget || over_cap).then_some(AllocError::Exhausted {
            requested: n,
            bytes,
        })
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn bytes_for<T>(n: usize) -> usize {
    n.saturating_mul(std::mem::size_of::<T>())
}

// SAFETY: memory comes from `Global`, which upholds the contract; the ledger
// only observes.
unsafe impl<T> Allocator<T> for CountingAllocator {
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let bytes = bytes_for::<T>(n);
        if let Some(err) = self.refuse(n, bytes) {
            return Err(err);
        }
        let ptr = Allocator::<T>::allocate(&Global, n)?;
        self.ledger.allocations.set(self.ledger.allocations.get() + 1);
        if bytes > 0 {
            let previous = self
                .ledger
                .blocks
                .borrow_mut()
                .insert(ptr.as_ptr() as usize, bytes);
            assert!(previous.is_none(), "block {ptr:p} handed out twice");
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let bytes = bytes_for::<T>(n);
        if bytes > 0 {
            let recorded = self
                .ledger
                .blocks
                .borrow_mut()
                .shift_remove(&(ptr.as_ptr() as usize));
            match recorded {
                Some(size) if size == bytes => {}
                Some(size) => {
                    panic!("block {ptr:p} released as {bytes} bytes but allocated as {size}")
                }
                None => panic!("release of unknown block {ptr:p}"),
            }
        }
        self.ledger
            .deallocations
            .set(self.ledger.deallocations.get() + 1);
        // SAFETY: the block came from `Global::allocate(n)`.
        unsafe { Allocator::<T>::deallocate(&Global, ptr, n) }
    }

    unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        self.ledger.constructs.set(self.ledger.constructs.get() + 1);
        // SAFETY: forwarded from the caller.
        unsafe { slot.as_ptr().write(value) }
    }

    unsafe fn destroy(&self, slot: NonNull<T>) {
        self.ledger.destroys.set(self.ledger.destroys.get() + 1);
        // SAFETY: forwarded from the caller.
        unsafe { slot.as_ptr().drop_in_place() }
    }
}
