use ndarray::Array1;

/// A sparse feature row: `(feature index, value)` pairs sorted by index.
pub type SparseRow = Vec<(usize, f64)>;

/// Scales a sparse row to unit L2 norm in place. All-zero rows are left untouched.
pub(crate) fn normalize_sparse(row: &mut [(usize, f64)]) {
    let norm: f64 = row.iter().map(|&(_, x)| x * x).sum::<f64>().sqrt();
    if norm > 1e-10 {
        for (_, value) in row.iter_mut() {
            *value /= norm;
        }
    }
}

/// Numerically stable softmax.
pub(crate) fn softmax(scores: &Array1<f64>) -> Array1<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp = scores.mapv(|s| (s - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index and value of the largest entry. Ties resolve to the lowest index.
pub(crate) fn argmax(values: &Array1<f64>) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}
