//! Feature normalization, lockstep shuffling and the validation split.

use rand::Rng;

use crate::error::{IrisError, Result};

/// A feature vector together with its label.
pub type Pair = (Vec<f64>, Vec<f64>);

/// Euclidean length: `sqrt(sum v_i^2)`.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Scales `v` to unit L2 length.
///
/// A zero or non-finite norm cannot be divided out and yields
/// `IrisError::DegenerateVector` (with `index` 0; see `normalize_rows` for
/// row-aware errors).
pub fn normalize(v: &[f64]) -> Result<Vec<f64>> {
    normalize_at(v, 0)
}

/// Normalizes every row, reporting the offending row index on failure.
pub fn normalize_rows(rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_at(row, i))
        .collect()
}

fn normalize_at(v: &[f64], index: usize) -> Result<Vec<f64>> {
    let norm = l2_norm(v);
    if norm == 0.0 || !norm.is_finite() {
        return Err(IrisError::DegenerateVector { index });
    }
    Ok(v.iter().map(|x| x / norm).collect())
}

/// Pairs index-aligned features and labels.
pub fn zip(xs: Vec<Vec<f64>>, ys: Vec<Vec<f64>>) -> Result<Vec<Pair>> {
    if xs.len() != ys.len() {
        return Err(IrisError::ShapeMismatch { expected: xs.len(), actual: ys.len() });
    }
    Ok(xs.into_iter().zip(ys).collect())
}

/// Splits pairs back into index-aligned features and labels.
pub fn unzip(pairs: Vec<Pair>) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    pairs.into_iter().unzip()
}

/// In-place Fisher–Yates shuffle.
///
/// For `i` from the last index down to 1, draws `j` uniformly from `[0, i]`
/// and swaps elements `i` and `j`. Shuffling `(feature, label)` pairs as one
/// slice keeps the two sequences aligned.
pub fn shuffle_pairs<T, R: Rng + ?Sized>(pairs: &mut [T], rng: &mut R) {
    for i in (1..pairs.len()).rev() {
        let j = rng.gen_range(0..=i);
        pairs.swap(i, j);
    }
}

/// Holds out the trailing `fraction` of rows for validation.
///
/// Returns `(train_x, train_y, val_x, val_y)`. The training part is the first
/// `floor(n * (1 - fraction))` rows; order is preserved.
pub fn validation_split(
    mut xs: Vec<Vec<f64>>,
    mut ys: Vec<Vec<f64>>,
    fraction: f64,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>, Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    if xs.len() != ys.len() {
        return Err(IrisError::ShapeMismatch { expected: xs.len(), actual: ys.len() });
    }
    if !(0.0..1.0).contains(&fraction) {
        return Err(IrisError::Config(format!(
            "validation fraction must be in [0, 1), got {}",
            fraction
        )));
    }
    let n_train = (xs.len() as f64 * (1.0 - fraction)).floor() as usize;
    let val_x = xs.split_off(n_train);
    let val_y = ys.split_off(n_train);
    Ok((xs, ys, val_x, val_y))
}
