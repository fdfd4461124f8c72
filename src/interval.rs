//! Normal-approximation confidence intervals.
//!
//! Both intervals use the standard normal critical value z rather than a
//! t quantile. That is a large-sample simplification: groups with fewer than
//! [`SMALL_SAMPLE_THRESHOLD`] observations get a
//! [`ValidityWarning::SmallSample`] attached.
//!
//! Standard errors use the Bessel-corrected sample standard deviation.
//!
//! # Examples
//!
//! ```
//! use u_inference::interval::{mean_difference_interval, IntervalPosition};
//!
//! let morning = [10.0, 12.0, 11.0, 13.0, 12.0];
//! let evening = [20.0, 19.0, 21.0, 20.0, 22.0];
//! let ci = mean_difference_interval(&morning, &evening, 0.95).unwrap();
//! assert!((ci.estimate + 8.8).abs() < 1e-12);
//! assert_eq!(ci.position(0.0), IntervalPosition::EntirelyBelow);
//! ```

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::config::z_critical;
use crate::error::{ensure_probability, InferenceResult, ValidityWarning};
use crate::sample::{sample_mean, sample_variance};

/// Group size below which the normal approximation is flagged.
pub const SMALL_SAMPLE_THRESHOLD: usize = 30;

/// Sample size(s) behind an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SampleSizes {
    /// Single-mean interval.
    One(usize),
    /// Difference of two independent means.
    Two(usize, usize),
}

/// Where an interval lies relative to a reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum IntervalPosition {
    /// Lower bound above the reference.
    EntirelyAbove,
    /// Upper bound below the reference.
    EntirelyBelow,
    /// Reference inside [lower, upper].
    Straddles,
}

/// A confidence interval with its ingredients.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IntervalEstimate {
    /// Point estimate (mean, or difference of means).
    pub estimate: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Confidence level.
    pub confidence: f64,
    /// Standard error of the estimate.
    pub std_error: f64,
    /// Normal critical value used.
    pub z_critical: f64,
    /// Sample size(s).
    pub sizes: SampleSizes,
    /// Validity caveats.
    pub warnings: Vec<ValidityWarning>,
}

impl IntervalEstimate {
    /// Half-width z·SE.
    pub fn margin(&self) -> f64 {
        self.z_critical * self.std_error
    }

    /// Classifies the interval against `reference`.
    ///
    /// For a difference of means with `reference = 0`, an interval entirely
    /// above or below zero indicates a significant difference at level
    /// 1 − confidence; a straddling interval gives no such evidence.
    pub fn position(&self, reference: f64) -> IntervalPosition {
        if self.lower > reference {
            IntervalPosition::EntirelyAbove
        } else if self.upper < reference {
            IntervalPosition::EntirelyBelow
        } else {
            IntervalPosition::Straddles
        }
    }
}

/// Interval for one mean: x̄ ± z·s/√n.
///
/// # Errors
///
/// `InvalidParameter` for a confidence level outside (0, 1);
/// `InsufficientData` when n < 2; `NonFinite` for missing entries.
///
/// # Examples
///
/// ```
/// use u_inference::interval::mean_interval;
///
/// let weights = [151.0, 148.5, 152.3, 149.9, 150.4, 147.8];
/// let ci = mean_interval(&weights, 0.95).unwrap();
/// assert!(ci.lower < ci.estimate && ci.estimate < ci.upper);
/// ```
pub fn mean_interval(data: &[f64], confidence: f64) -> InferenceResult<IntervalEstimate> {
    ensure_probability(confidence, "confidence")?;
    let variance = sample_variance(data)?;
    let mean = sample_mean(data)?;
    let n = data.len();

    let std_error = (variance / n as f64).sqrt();
    let z = z_critical(confidence);

    let mut warnings = Vec::new();
    small_sample_check(&mut warnings, "sample", n);

    Ok(IntervalEstimate {
        estimate: mean,
        lower: mean - z * std_error,
        upper: mean + z * std_error,
        confidence,
        std_error,
        z_critical: z,
        sizes: SampleSizes::One(n),
        warnings,
    })
}

/// Interval for μ_a − μ_b from independent samples with unequal variances.
///
/// SE = √(s_a²/n_a + s_b²/n_b), no pooling.
///
/// # Errors
///
/// As [`mean_interval`], for either sample.
pub fn mean_difference_interval(
    a: &[f64],
    b: &[f64],
    confidence: f64,
) -> InferenceResult<IntervalEstimate> {
    ensure_probability(confidence, "confidence")?;
    let var_a = sample_variance(a)?;
    let var_b = sample_variance(b)?;
    let diff = sample_mean(a)? - sample_mean(b)?;
    let (n_a, n_b) = (a.len(), b.len());

    let std_error = (var_a / n_a as f64 + var_b / n_b as f64).sqrt();
    let z = z_critical(confidence);

    let mut warnings = Vec::new();
    small_sample_check(&mut warnings, "sample_a", n_a);
    small_sample_check(&mut warnings, "sample_b", n_b);

    log::debug!(
        "mean difference: diff={diff:.4} se={std_error:.4} z={z:.4} (n_a={n_a}, n_b={n_b})"
    );

    Ok(IntervalEstimate {
        estimate: diff,
        lower: diff - z * std_error,
        upper: diff + z * std_error,
        confidence,
        std_error,
        z_critical: z,
        sizes: SampleSizes::Two(n_a, n_b),
        warnings,
    })
}

fn small_sample_check(warnings: &mut Vec<ValidityWarning>, sample: &'static str, n: usize) {
    if n < SMALL_SAMPLE_THRESHOLD {
        let w = ValidityWarning::SmallSample { sample, n };
        log::warn!("{w}");
        warnings.push(w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;

    #[test]
    fn single_mean_by_hand() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let ci = mean_interval(&data, 0.95).unwrap();
        let se = (32.0_f64 / 7.0 / 8.0).sqrt();
        assert!((ci.estimate - 5.0).abs() < 1e-12);
        assert!((ci.std_error - se).abs() < 1e-12);
        assert!((ci.z_critical - 1.959964).abs() < 1e-4);
        assert!((ci.upper - ci.estimate - ci.margin()).abs() < 1e-12);
        assert_eq!(ci.sizes, SampleSizes::One(8));
        assert_eq!(ci.warnings.len(), 1);
    }

    #[test]
    fn difference_entirely_below_zero() {
        let a = [10.0, 12.0, 11.0, 13.0, 12.0];
        let b = [20.0, 19.0, 21.0, 20.0, 22.0];
        let ci = mean_difference_interval(&a, &b, 0.95).unwrap();
        // s_a² = 1.3, s_b² = 1.3
        let se = (1.3_f64 / 5.0 + 1.3 / 5.0).sqrt();
        // means 11.6 and 20.4
        assert!((ci.estimate + 8.8).abs() < 1e-12);
        assert!((ci.std_error - se).abs() < 1e-12);
        assert!(ci.upper < 0.0);
        assert_eq!(ci.position(0.0), IntervalPosition::EntirelyBelow);
        assert_eq!(ci.sizes, SampleSizes::Two(5, 5));
        assert_eq!(ci.warnings.len(), 2);
    }

    #[test]
    fn repeated_difference_is_bit_identical() {
        let a = [10.3, 12.1, 11.7, 13.2, 12.05, 11.4];
        let b = [20.2, 19.6, 21.15, 20.0, 22.3];
        let first = mean_difference_interval(&a, &b, 0.95).unwrap();
        let second = mean_difference_interval(&a, &b, 0.95).unwrap();
        assert_eq!(first.estimate.to_bits(), second.estimate.to_bits());
        assert_eq!(first.lower.to_bits(), second.lower.to_bits());
        assert_eq!(first.upper.to_bits(), second.upper.to_bits());
        assert_eq!(first.std_error.to_bits(), second.std_error.to_bits());
        assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn overlapping_groups_straddle_zero() {
        let a = [5.0, 6.0, 7.0, 5.5, 6.5, 6.0];
        let b = [5.2, 6.1, 6.8, 5.6, 6.4, 5.9];
        let ci = mean_difference_interval(&a, &b, 0.95).unwrap();
        assert_eq!(ci.position(0.0), IntervalPosition::Straddles);
        let flipped = mean_difference_interval(&b, &a, 0.95).unwrap();
        assert!((ci.estimate + flipped.estimate).abs() < 1e-12);
    }

    #[test]
    fn large_groups_carry_no_warning() {
        let a: Vec<f64> = (0..40).map(|i| 100.0 + (i % 7) as f64).collect();
        let b: Vec<f64> = (0..35).map(|i| 90.0 + (i % 5) as f64).collect();
        let ci = mean_difference_interval(&a, &b, 0.95).unwrap();
        assert!(ci.warnings.is_empty());
        assert_eq!(ci.position(0.0), IntervalPosition::EntirelyAbove);
    }

    #[test]
    fn wider_at_higher_confidence() {
        let data = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let ci90 = mean_interval(&data, 0.90).unwrap();
        let ci99 = mean_interval(&data, 0.99).unwrap();
        assert!(ci99.margin() > ci90.margin());
    }

    #[test]
    fn edge_cases() {
        assert!(matches!(
            mean_interval(&[1.0], 0.95),
            Err(InferenceError::InsufficientData { .. })
        ));
        assert!(matches!(
            mean_interval(&[1.0, 2.0], 1.5),
            Err(InferenceError::InvalidParameter { .. })
        ));
        assert!(mean_difference_interval(&[1.0, 2.0], &[3.0], 0.95).is_err());
        assert!(mean_interval(&[1.0, f64::NAN, 3.0], 0.95).is_err());
    }
}
