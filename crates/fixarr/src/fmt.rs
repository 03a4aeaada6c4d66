//! Textual rendering: `[e0, e1, ..., en]`, or `[]` when empty.

use std::fmt;

use fixarr_core::Allocator;

use crate::arr::Arr;

impl<T: fmt::Display, A: Allocator<T>> fmt::Display for Arr<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut items = self.iter();
        if let Some(first) = items.next() {
            first.fmt(f)?;
            for item in items {
                f.write_str(", ")?;
                item.fmt(f)?;
            }
        }
        f.write_str("]")
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for Arr<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
