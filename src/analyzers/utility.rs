/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `part` as a percentage of `total`. Returns 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Nearest-rank percentile: the value at index `floor(len * num / den)` of an
/// ascending slice. No interpolation. Returns `None` for empty input.
pub fn nearest_rank(sorted: &[f64], num: usize, den: usize) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (sorted.len() * num / den).min(sorted.len() - 1);
    Some(sorted[rank])
}
