//! Benchmark workloads for fixarr.
//!
//! - [`random_values`]: deterministic element data via seeded ChaCha8.
//! - [`sized_arrays`]: one array per benchmark size, filled from
//!   [`random_values`].

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fixarr::{Arr, ArrError};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Array lengths exercised by every benchmark group.
pub const SIZES: [usize; 3] = [16, 1_024, 65_536];

/// Generate `n` pseudo-random values; the same seed always yields the same
/// sequence.
pub fn random_values(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.next_u64()).collect()
}

/// One array per entry of [`SIZES`], paired with its length.
pub fn sized_arrays(seed: u64) -> Result<Vec<(usize, Arr<u64>)>, ArrError> {
    SIZES
        .iter()
        .map(|&n| Ok((n, Arr::from_slice(&random_values(n, seed))?)))
        .collect()
}
