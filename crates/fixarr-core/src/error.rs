//! Error types for allocation and element access.

use std::error::Error;
use std::fmt;

/// Errors reported by an [`Allocator`](crate::Allocator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count exceeds what the allocator can
    /// represent for this element type.
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
        /// Largest element count the allocator accepts.
        max: usize,
    },
    /// The allocator could not supply a block of the requested size.
    Exhausted {
        /// Number of elements requested.
        requested: usize,
        /// Size of the requested block in bytes.
        bytes: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested, max } => {
                write!(
                    f,
                    "capacity overflow: requested {requested} elements, max {max}"
                )
            }
            Self::Exhausted { requested, bytes } => {
                write!(
                    f,
                    "allocation of {requested} elements ({bytes} bytes) failed"
                )
            }
        }
    }
}

impl Error for AllocError {}

/// Errors from container operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrError {
    /// Checked access with an index at or past the end.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the container at the time of access.
        len: usize,
    },
    /// Storage could not be allocated.
    Alloc(AllocError),
}

impl fmt::Display for ArrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for array of length {len}")
            }
            Self::Alloc(err) => write!(f, "storage allocation failed: {err}"),
        }
    }
}

impl Error for ArrError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<AllocError> for ArrError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}
