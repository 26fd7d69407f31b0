//! Seeded train/test partitioning

use crate::error::{Result, TitanicError};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with `seed` and hold out `ceil(n_rows * test_size)`
/// rows. The first shuffled rows form the test partition.
pub fn train_test_split(n_rows: usize, test_size: f64, seed: u64) -> Result<TrainTestIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TitanicError::Validation(format!(
            "test_size must lie in (0, 1), got {}",
            test_size
        )));
    }
    if n_rows < 2 {
        return Err(TitanicError::Validation(format!(
            "Need at least 2 rows to split, got {}",
            n_rows
        )));
    }

    let n_test = (n_rows as f64 * test_size).ceil() as usize;
    if n_test >= n_rows {
        return Err(TitanicError::Validation(format!(
            "test_size {} leaves no training rows out of {}",
            test_size, n_rows
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestIndices {
        train,
        test: indices,
    })
}

/// Rows of `df` at `indices`, in that order
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}
