pub fn sum(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0, |acc, v| acc + v)
}

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(sum(samples) / samples.len() as f64)
}

/// Calculates the percentile at `level` (in `[0, 1]`) with linear interpolation
/// between the two closest order statistics.
/// `samples` has to be non-empty and sorted in ascending order.
pub fn percentile(samples: &[f64], level: f64) -> f64 {
    let n = samples.len();
    // NOTE: position on the (zero based) index scale
    let position = (n - 1) as f64 * level.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let weight = position - lower as f64;
    samples[lower] + weight * (samples[upper] - samples[lower])
}

/// Sorts a copy of the samples and returns its median.
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sorted = sorted(samples);
    Some(percentile(&sorted, 0.5))
}

pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// The unbiased sample variance (denominator `n - 1`).
/// Exactly zero for a constant sample, whatever the rounding of `mean`.
pub fn variance(samples: &[f64], mean: f64) -> Option<f64> {
    let len = samples.len();
    if len <= 1 {
        return None;
    }
    if samples.iter().all(|v| *v == samples[0]) {
        return Some(0.0);
    }
    let squared_errors = samples.iter().fold(0.0, |acc, v| {
        let error = (v - mean).powi(2);
        acc + error
    });

    Some(squared_errors / (len - 1) as f64)
}

/// The unbiased sample standard deviation.
pub fn standard_deviation(samples: &[f64], mean: f64) -> Option<f64> {
    variance(samples, mean).map(f64::sqrt)
}
