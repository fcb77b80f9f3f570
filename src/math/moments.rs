//! Moment-based kernels shared by the statistics and correlation code

use ndarray::{Array1, ArrayView1};

/// Deviations of every value from the mean of the view
///
/// Returns an empty array for an empty view.
pub fn deviations(values: ArrayView1<'_, f64>) -> Array1<f64> {
    values
        .mean()
        .map_or_else(|| Array1::zeros(0), |mean| values.mapv(|x| x - mean))
}

/// Population variance `mean((x - mean)^2)`, `None` when empty
pub fn population_variance(values: ArrayView1<'_, f64>) -> Option<f64> {
    let deviations = deviations(values);
    deviations.mapv(|d| d * d).mean()
}

/// Pearson product-moment correlation of two equally long series
///
/// Returns `None` when the lengths differ. Returns `Some(0.0)` when either
/// series is empty or has zero total squared deviation (a constant column).
/// The result is clamped to `[-1, 1]` to absorb rounding.
pub fn pearson(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    if a.is_empty() || is_constant(a) || is_constant(b) {
        return Some(0.0);
    }

    let dev_a = deviations(a);
    let dev_b = deviations(b);
    let sum_sq_a = dev_a.dot(&dev_a);
    let sum_sq_b = dev_b.dot(&dev_b);
    if sum_sq_a <= 0.0 || sum_sq_b <= 0.0 {
        return Some(0.0);
    }

    Some((dev_a.dot(&dev_b) / (sum_sq_a * sum_sq_b).sqrt()).clamp(-1.0, 1.0))
}

/// Whether every value in the view is identical
///
/// Compares extremes rather than deviations so large integer values that do
/// not survive the mean exactly are still classified correctly.
pub fn is_constant(values: ArrayView1<'_, f64>) -> bool {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
            (min.min(x), max.max(x))
        });
    max <= min
}
