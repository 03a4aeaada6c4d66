//! Element fixtures.
//!
//! - [`Tracked`]: counts its drops in a shared counter.
//! - [`CloneBomb`]: panics on clone once a shared fuse burns down.
//! - [`NoDefault`]: a plain value type with no `Default` impl.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A value that bumps a shared counter when dropped.
///
/// Clones share the counter, so every instance that ever existed is
/// accounted for.
pub struct Tracked {
    value: i32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    /// A fresh drop counter.
    pub fn counter() -> Rc<Cell<usize>> {
        Rc::new(Cell::new(0))
    }

    pub fn new(value: i32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            drops: Rc::clone(drops),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self::new(self.value, &self.drops)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl fmt::Display for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// A value whose `clone` panics once its fuse reaches zero.
///
/// Every successful clone burns one unit of the shared fuse. Used to
/// inject a failure part-way through a copy.
pub struct CloneBomb {
    value: i32,
    fuse: Rc<Cell<usize>>,
}

impl CloneBomb {
    /// A fuse that allows `clones` successful clones.
    pub fn fuse(clones: usize) -> Rc<Cell<usize>> {
        Rc::new(Cell::new(clones))
    }

    pub fn new(value: i32, fuse: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            fuse: Rc::clone(fuse),
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let left = self.fuse.get();
        if left == 0 {
            panic!("clone bomb {} detonated", self.value);
        }
        self.fuse.set(left - 1);
        Self::new(self.value, &self.fuse)
    }
}

impl PartialEq for CloneBomb {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for CloneBomb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CloneBomb").field(&self.value).finish()
    }
}

/// An element type with no default value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoDefault(pub i32);

impl NoDefault {
    pub fn new(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for NoDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
