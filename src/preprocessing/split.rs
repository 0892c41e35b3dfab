//! Train/test row splitting

use crate::error::{PrepError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Partition a frame into disjoint train/test subsets.
///
/// Row-random (not stratified) and deterministic for a given seed: the
/// same input always yields the same partition. The test subset gets
/// `ceil(n * test_fraction)` rows.
pub fn train_test_split(
    df: &DataFrame,
    test_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(PrepError::DataError(format!(
            "test_fraction must be in [0, 1), got {test_fraction}"
        )));
    }

    let n = df.height();
    let mut indices: Vec<IdxSize> = (0..n as IdxSize).collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let test_idx = IdxCa::from_vec("idx".into(), indices[..n_test].to_vec());
    let train_idx = IdxCa::from_vec("idx".into(), indices[n_test..].to_vec());

    Ok((df.take(&train_idx)?, df.take(&test_idx)?))
}
