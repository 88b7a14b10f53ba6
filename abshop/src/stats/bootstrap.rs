use super::descriptive::{mean, percentile, sorted};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn resample_mean<R: Rng>(rng: &mut R, samples: &[f64]) -> f64 {
    let n = samples.len();
    let total = (0..n).fold(0.0, |acc, _| acc + samples[rng.gen_range(0..n)]);
    total / n as f64
}

/// Draws bootstrap resamples (with replacement) of two groups.
/// Seeded, so that a report can be reproduced.
pub struct BootstrapSampler<'a> {
    sample_a: &'a [f64],
    sample_b: &'a [f64],
    rng: ChaCha8Rng,
}

impl<'a> BootstrapSampler<'a> {
    pub fn new(sample_a: &'a [f64], sample_b: &'a [f64], seed: u64) -> Self {
        Self {
            sample_a,
            sample_b,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// `mean(a*) - mean(b*)` for `n_resamples` pairs of resamples `a*`, `b*`.
    /// Empty if either group has no observations.
    pub fn mean_differences(&mut self, n_resamples: usize) -> Vec<f64> {
        if self.sample_a.is_empty() || self.sample_b.is_empty() {
            return Vec::with_capacity(0);
        }

        let (sample_a, sample_b) = (self.sample_a, self.sample_b);
        (0..n_resamples)
            .map(|_| {
                let mean_a = resample_mean(&mut self.rng, sample_a);
                let mean_b = resample_mean(&mut self.rng, sample_b);
                mean_a - mean_b
            })
            .collect()
    }
}

/// Percentile interval enclosing `1 - alpha` of the bootstrap distribution.
pub fn confidence_interval(bootstrap_values: &[f64], alpha: f64) -> Option<(f64, f64)> {
    if bootstrap_values.is_empty() || !(0.0..1.0).contains(&alpha) {
        return None;
    }
    let values = sorted(bootstrap_values);
    let lower_bound = percentile(&values, alpha / 2.0);
    let upper_bound = percentile(&values, 1.0 - alpha / 2.0);
    Some((lower_bound, upper_bound))
}

/// Mean of the bootstrap distribution.
pub fn bootstrap_mean(bootstrap_values: &[f64]) -> Option<f64> {
    mean(bootstrap_values)
}
