//! Reproducible train/held-out partitioning.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Fixed seed shared by the split and the forest, so repeated runs on
/// identical input produce identical partitions and trees.
pub const DEFAULT_SEED: u64 = 42;

/// Row indices assigned to the training and held-out partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and carve off the held-out
/// fraction (rounded up, clamped so both partitions stay non-empty).
///
/// Callers must guarantee `n >= 2`.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> SplitIndices {
    debug_assert!(n >= 2, "split requires at least two rows");
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    SplitIndices { train, test }
}
