use super::descriptive::{mean, standard_deviation};
use std::f64::consts::PI;

/// Scott's rule of thumb, `std * n^(-1/5)` with the unbiased standard deviation.
/// `None` for fewer than two observations or a constant sample.
pub fn scott_bandwidth(samples: &[f64]) -> Option<f64> {
    let mean = mean(samples)?;
    let std = standard_deviation(samples, mean)?;
    if !(std > 0.0) {
        return None;
    }
    Some(std * (samples.len() as f64).powf(-0.2))
}

/// Gaussian kernel density estimate of a sample.
#[derive(Debug, Clone)]
pub struct GaussianKde<'a> {
    samples: &'a [f64],
    bandwidth: f64,
}

impl<'a> GaussianKde<'a> {
    pub fn new(samples: &'a [f64]) -> Option<Self> {
        let bandwidth = scott_bandwidth(samples)?;
        Some(Self { samples, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn density(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let kernel_sum = self.samples.iter().fold(0.0, |acc, v| {
            let z = (x - v) / h;
            acc + (-0.5 * z * z).exp()
        });
        kernel_sum / (self.samples.len() as f64 * h * (2.0 * PI).sqrt())
    }

    /// `(x, density(x))` at `n_points` equally spaced points of `[min, max]`.
    pub fn curve(&self, min: f64, max: f64, n_points: usize) -> Vec<(f64, f64)> {
        if n_points < 2 || !(max > min) {
            return Vec::with_capacity(0);
        }
        let step = (max - min) / (n_points - 1) as f64;
        (0..n_points)
            .map(|i| {
                let x = min + i as f64 * step;
                (x, self.density(x))
            })
            .collect()
    }
}
