use super::descriptive::{mean, variance};
use crate::{AbShopError, AbShopResult};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt::Display;

/// Result of Welch's (unequal variance) two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub t_statistic: f64,
    pub p_value: f64,
    /// `mean(a) - mean(b)`
    pub mean_difference: f64,
    /// Welch–Satterthwaite degrees of freedom, in general not an integer.
    pub df: f64,
    pub sample_size_a: usize,
    pub sample_size_b: usize,
}

impl Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "t-statistic        | {:.2}", self.t_statistic)?;
        writeln!(f, "p-value            | {:.3e}", self.p_value)?;
        writeln!(f, "degrees of freedom | {:.2}", self.df)?;
        writeln!(f, "Mean difference    | {:.2}", self.mean_difference)?;
        writeln!(f, "Size group A       | {}", self.sample_size_a)?;
        write!(f, "Size group B       | {}", self.sample_size_b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PromoEffect {
    Increased { p_value: f64 },
    Decreased { p_value: f64 },
    Inconclusive,
}

impl Display for PromoEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromoEffect::Increased { p_value } => {
                write!(f, "sales increased (p-value {:.3e})", p_value)
            }
            PromoEffect::Decreased { p_value } => {
                write!(f, "sales decreased (p-value {:.3e})", p_value)
            }
            PromoEffect::Inconclusive => write!(f, "inconclusive (no significant change)"),
        }
    }
}

impl TestResult {
    /// Classifies the result at significance level `alpha`, reading group A
    /// as the promotion group.
    pub fn effect(&self, alpha: f64) -> PromoEffect {
        if self.p_value >= alpha {
            return PromoEffect::Inconclusive;
        }

        if self.mean_difference > 0.0 {
            PromoEffect::Increased {
                p_value: self.p_value,
            }
        } else {
            PromoEffect::Decreased {
                p_value: self.p_value,
            }
        }
    }
}

/// Checks that `samples` can enter a variance based test.
pub(crate) fn check_sample(label: &str, samples: &[f64]) -> AbShopResult<()> {
    match samples.len() {
        0 => Err(AbShopError::EmptyGroup {
            label: label.to_string(),
        }),
        1 => Err(AbShopError::InsufficientSampleSize {
            label: label.to_string(),
            size: 1,
        }),
        _ if samples.iter().any(|v| !v.is_finite()) => Err(AbShopError::NonFiniteObservation {
            label: label.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Two-tailed p-value `2 * (1 - CDF(|t|))` of the Student's t-distribution
/// with (possibly fractional) `df` degrees of freedom.
///
/// Uses the symmetry `1 - CDF(|t|) = CDF(-|t|)` so that small tail
/// probabilities keep their precision. The CDF is evaluated through the
/// regularized incomplete beta function of `statrs`, which agrees with
/// reference implementations within 1e-6 for |t| < 20 and df > 1.
pub fn two_tailed_p_value(t: f64, df: f64) -> AbShopResult<f64> {
    let t_dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| AbShopError::Distribution(e.to_string()))?;
    let p_value = 2.0 * t_dist.cdf(-t.abs());
    Ok(p_value.min(1.0))
}

/// Welch's t-test for the difference of the means of `sample_a` and `sample_b`.
///
/// Both samples need at least 2 finite observations. Fails with
/// [`AbShopError::DegenerateVariance`] if both samples have zero variance.
pub fn welch_t_test(sample_a: &[f64], sample_b: &[f64]) -> AbShopResult<TestResult> {
    check_sample("A", sample_a)?;
    check_sample("B", sample_b)?;

    let n_a = sample_a.len() as f64;
    let n_b = sample_b.len() as f64;

    // NOTE: both samples are non-empty at this point
    let mean_a = mean(sample_a).unwrap_or_default();
    let mean_b = mean(sample_b).unwrap_or_default();
    let var_a = variance(sample_a, mean_a).unwrap_or_default();
    let var_b = variance(sample_b, mean_b).unwrap_or_default();

    let se2_a = var_a / n_a;
    let se2_b = var_b / n_b;
    let se2 = se2_a + se2_b;
    if se2 == 0.0 {
        return Err(AbShopError::DegenerateVariance);
    }

    let mean_difference = mean_a - mean_b;
    let t_statistic = mean_difference / se2.sqrt();

    // Welch–Satterthwaite equation
    let df = se2.powi(2) / (se2_a.powi(2) / (n_a - 1.0) + se2_b.powi(2) / (n_b - 1.0));

    let p_value = two_tailed_p_value(t_statistic, df)?;

    Ok(TestResult {
        t_statistic,
        p_value,
        mean_difference,
        df,
        sample_size_a: sample_a.len(),
        sample_size_b: sample_b.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn assert_close(value: f64, expected: f64, tolerance: f64) {
        assert!(
            (value - expected).abs() < tolerance,
            "expected {} to be within {} of {}",
            value,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_known_values() {
        let a = vec![10., 12., 14., 16., 18.];
        let b = vec![5., 7., 9., 11., 13.];

        let result = welch_t_test(&a, &b).unwrap();
        assert_eq!(result.mean_difference, 5.0);
        assert_eq!(result.t_statistic, 2.5);
        assert_eq!(result.df, 8.0);
        assert_close(result.p_value, 0.036942037713624, TOLERANCE);
        assert_eq!(result.sample_size_a, 5);
        assert_eq!(result.sample_size_b, 5);
    }

    #[test]
    fn test_unequal_variances() {
        let with_promo = vec![20.5, 22.1, 19.8, 25.3, 24.0, 21.7];
        let without_promo = vec![18.2, 17.9, 19.5, 16.8];

        let result = welch_t_test(&with_promo, &without_promo).unwrap();
        assert_close(result.mean_difference, 4.133333333333336, 1e-9);
        assert_close(result.t_statistic, 4.065901590876731, 1e-9);
        assert_close(result.df, 7.804388195806831, 1e-9);
        assert_close(result.p_value, 0.003796269277495690, TOLERANCE);
        assert_eq!(result.sample_size_a, 6);
        assert_eq!(result.sample_size_b, 4);
    }

    #[test]
    fn test_deterministic() {
        let a = vec![3.2, 4.1, 5.7, 2.2, 8.9];
        let b = vec![1.1, 0.4, 2.9, 3.3];

        let fst = welch_t_test(&a, &b).unwrap();
        let snd = welch_t_test(&a, &b).unwrap();
        assert_eq!(fst, snd);
    }

    #[test]
    fn test_symmetry() {
        let a = vec![20.5, 22.1, 19.8, 25.3, 24.0, 21.7];
        let b = vec![18.2, 17.9, 19.5, 16.8];

        let ab = welch_t_test(&a, &b).unwrap();
        let ba = welch_t_test(&b, &a).unwrap();
        assert_eq!(ab.t_statistic, -ba.t_statistic);
        assert_eq!(ab.mean_difference, -ba.mean_difference);
        assert_eq!(ab.p_value, ba.p_value);
        assert_eq!(ab.df, ba.df);
        assert_eq!(ab.sample_size_a, ba.sample_size_b);
    }

    #[test]
    fn test_scale_invariant_p_value() {
        let a = vec![20.5, 22.1, 19.8, 25.3, 24.0, 21.7];
        let b = vec![18.2, 17.9, 19.5, 16.8];
        let scaled_a: Vec<f64> = a.iter().map(|v| v * 37.5).collect();
        let scaled_b: Vec<f64> = b.iter().map(|v| v * 37.5).collect();

        let result = welch_t_test(&a, &b).unwrap();
        let scaled = welch_t_test(&scaled_a, &scaled_b).unwrap();
        assert_close(scaled.p_value, result.p_value, 1e-12);
        assert_close(scaled.t_statistic, result.t_statistic, 1e-9);
        assert_close(scaled.df, result.df, 1e-9);
        assert_close(scaled.mean_difference, 37.5 * result.mean_difference, 1e-9);
    }

    #[test]
    fn test_degenerate_variance() {
        let a = vec![5., 5., 5.];
        let b = vec![5., 5., 5.];
        assert!(matches!(
            welch_t_test(&a, &b),
            Err(AbShopError::DegenerateVariance)
        ));

        // one constant group is fine, df falls back to the other group
        let result = welch_t_test(&a, &[4., 6., 8.]).unwrap();
        assert_eq!(result.df, 2.0);
    }

    #[test]
    fn test_degenerate_variance_decimal_constants() {
        // the means of these groups are not exactly representable
        for (a, b) in [
            (vec![0.1; 3], vec![0.7; 3]),
            (vec![1.1; 7], vec![2.3; 5]),
            (vec![0.1; 3], vec![0.1; 3]),
        ] {
            assert!(matches!(
                welch_t_test(&a, &b),
                Err(AbShopError::DegenerateVariance)
            ));
        }

        let result = welch_t_test(&[0.1; 3], &[4., 6., 8.]).unwrap();
        assert_eq!(result.df, 2.0);
    }

    #[test]
    fn test_invalid_samples() {
        assert!(matches!(
            welch_t_test(&[], &[1., 2.]),
            Err(AbShopError::EmptyGroup { .. })
        ));
        assert!(matches!(
            welch_t_test(&[1., 2.], &[3.]),
            Err(AbShopError::InsufficientSampleSize { size: 1, .. })
        ));
        assert!(matches!(
            welch_t_test(&[1., f64::NAN], &[3., 4.]),
            Err(AbShopError::NonFiniteObservation { .. })
        ));
    }

    #[test]
    fn test_two_tailed_p_value() {
        assert_close(two_tailed_p_value(2.0, 3.5).unwrap(), 0.126138522575914, TOLERANCE);
        assert_close(two_tailed_p_value(-2.0, 3.5).unwrap(), 0.126138522575914, TOLERANCE);
        assert_close(two_tailed_p_value(1.0, 1.5).unwrap(), 0.451135367276710, TOLERANCE);
        assert_close(two_tailed_p_value(0.0, 4.0).unwrap(), 1.0, TOLERANCE);
        assert!(two_tailed_p_value(1.0, -1.0).is_err());
    }

    #[test]
    fn test_effect() {
        let mut result = welch_t_test(&[10., 12., 14., 16., 18.], &[5., 7., 9., 11., 13.]).unwrap();

        assert_eq!(
            result.effect(0.05),
            PromoEffect::Increased {
                p_value: result.p_value
            }
        );
        assert_eq!(result.effect(0.01), PromoEffect::Inconclusive);

        result.mean_difference = -result.mean_difference;
        assert_eq!(
            result.effect(0.05),
            PromoEffect::Decreased {
                p_value: result.p_value
            }
        );
    }
}
