//! Numeric helpers shared by the rules. Every function is total: empty
//! inputs and zero denominators map to documented fallback values.

/// Guard for zero means, zero areas and zero diagonals.
pub const EPSILON: f64 = 1e-9;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by n).
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Standard deviation over mean; 0 when the mean vanishes.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m.abs() < EPSILON {
        return 0.0;
    }
    std_dev(values) / m
}

/// `1 − min(CV / √(n−1), 1)`. √(n−1) is the largest CV a non-negative
/// sample of size n can reach. Fewer than two values are perfectly uniform.
pub fn cv_uniformity(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 1.0;
    }
    let max_cv = ((values.len() - 1) as f64).sqrt();
    1.0 - (coefficient_of_variation(values) / max_cv).min(1.0)
}

/// Geometric mean of the strictly positive factors; 0 when there are none.
pub fn geometric_mean_of_nonzero(factors: &[f64]) -> f64 {
    let logs: Vec<f64> = factors.iter().filter(|f| **f > EPSILON).map(|f| f.ln()).collect();
    if logs.is_empty() {
        return 0.0;
    }
    mean(&logs).exp()
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Shannon entropy in nats of a histogram.
pub fn shannon_entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum()
}

pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
