//! Central moments and shape coefficients.
//!
//! Every quantity here uses the biased (divide-by-n) moment convention:
//!
//! - m_k = (1/n) Σ (xᵢ − x̄)^k
//! - g₁ = m₃ / m₂^{3/2} (skewness)
//! - g₂ = m₄ / m₂² − 3 (excess kurtosis)
//!
//! Bias-adjusted variants G₁ and G₂ are provided for reference; they are
//! undefined below n = 3 and n = 4 respectively and are returned as `None`
//! there.
//!
//! # Examples
//!
//! ```
//! use u_inference::moments::{skewness, excess_kurtosis, SkewnessShape, skewness_shape};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 10.0];
//! let g1 = skewness(&data).unwrap();
//! assert!(g1 > 0.0);
//! assert_eq!(skewness_shape(g1), SkewnessShape::RightSkewed);
//! assert!(excess_kurtosis(&data).unwrap().is_finite());
//! ```
//!
//! # References
//!
//! Joanes & Gill (1998). "Comparing measures of sample skewness and
//! kurtosis". The Statistician, 47(1), 183–189.

#[cfg(feature = "serde")]
use serde::Serialize;
use u_numflow::stats;

use crate::error::{ensure_finite, ensure_len, InferenceError, InferenceResult};

/// |coefficient| below this is labelled symmetric / mesokurtic.
pub const SHAPE_TOLERANCE: f64 = 0.1;

/// Descriptive skewness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SkewnessShape {
    /// |g₁| < 0.1.
    ApproximatelySymmetric,
    /// Longer right tail.
    RightSkewed,
    /// Longer left tail.
    LeftSkewed,
}

/// Descriptive kurtosis label (relative to the normal distribution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum KurtosisShape {
    /// |g₂| < 0.1, normal-like peakedness.
    Mesokurtic,
    /// Sharper peak, heavier tails.
    Leptokurtic,
    /// Flatter peak, lighter tails.
    Platykurtic,
}

/// Per-column shape report.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ShapeSummary {
    /// Sample size.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Second central moment (biased variance).
    pub m2: f64,
    /// Third central moment.
    pub m3: f64,
    /// Fourth central moment.
    pub m4: f64,
    /// Skewness g₁.
    pub skewness: f64,
    /// Excess kurtosis g₂.
    pub excess_kurtosis: f64,
    /// Adjusted skewness G₁ (`None` for n < 3).
    pub adjusted_skewness: Option<f64>,
    /// Adjusted excess kurtosis G₂ (`None` for n < 4).
    pub adjusted_excess_kurtosis: Option<f64>,
    /// Label for g₁.
    pub skewness_shape: SkewnessShape,
    /// Label for g₂.
    pub kurtosis_shape: KurtosisShape,
}

/// k-th central moment (1/n) Σ (xᵢ − x̄)^k.
///
/// # Errors
///
/// `InsufficientData` for an empty sample, `NonFinite` for missing entries.
pub fn central_moment(data: &[f64], k: u32) -> InferenceResult<f64> {
    ensure_len(data, 1, "central moment")?;
    ensure_finite(data, "sample")?;
    let mean = stats::mean(data).ok_or(InferenceError::NonFinite { quantity: "sample" })?;
    Ok(moment_about(data, mean, k))
}

/// Biased variance m₂ (divide by n).
///
/// Not interchangeable with [`crate::sample::sample_variance`].
pub fn biased_variance(data: &[f64]) -> InferenceResult<f64> {
    ensure_len(data, 2, "biased variance")?;
    central_moment(data, 2)
}

/// Skewness g₁ = m₃ / m₂^{3/2}.
///
/// # Errors
///
/// `InsufficientData` when n < 2, `DegenerateInput` for a constant sample.
pub fn skewness(data: &[f64]) -> InferenceResult<f64> {
    let (m2, mean) = spread(data, "skewness")?;
    let m3 = moment_about(data, mean, 3);
    Ok(m3 / m2.powf(1.5))
}

/// Excess kurtosis g₂ = m₄ / m₂² − 3.
///
/// # Errors
///
/// `InsufficientData` when n < 2, `DegenerateInput` for a constant sample.
pub fn excess_kurtosis(data: &[f64]) -> InferenceResult<f64> {
    let (m2, mean) = spread(data, "excess kurtosis")?;
    let m4 = moment_about(data, mean, 4);
    Ok(m4 / (m2 * m2) - 3.0)
}

/// Adjusted Fisher–Pearson skewness G₁ = √(n(n−1))/(n−2) · g₁.
///
/// Returns `Ok(None)` for n < 3, where the adjustment is undefined.
pub fn adjusted_skewness(data: &[f64]) -> InferenceResult<Option<f64>> {
    let n = data.len();
    if n < 3 {
        return Ok(None);
    }
    let g1 = skewness(data)?;
    let nf = n as f64;
    Ok(Some((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1))
}

/// Adjusted excess kurtosis G₂ = [(n−1)/((n−2)(n−3))]·[(n+1)g₂ + 6].
///
/// Returns `Ok(None)` for n < 4, where the adjustment is undefined.
pub fn adjusted_excess_kurtosis(data: &[f64]) -> InferenceResult<Option<f64>> {
    let n = data.len();
    if n < 4 {
        return Ok(None);
    }
    let g2 = excess_kurtosis(data)?;
    let nf = n as f64;
    Ok(Some(
        (nf - 1.0) / ((nf - 2.0) * (nf - 3.0)) * ((nf + 1.0) * g2 + 6.0),
    ))
}

/// Labels a skewness coefficient.
pub fn skewness_shape(g1: f64) -> SkewnessShape {
    if g1.abs() < SHAPE_TOLERANCE {
        SkewnessShape::ApproximatelySymmetric
    } else if g1 > 0.0 {
        SkewnessShape::RightSkewed
    } else {
        SkewnessShape::LeftSkewed
    }
}

/// Labels an excess-kurtosis coefficient.
pub fn kurtosis_shape(g2: f64) -> KurtosisShape {
    if g2.abs() < SHAPE_TOLERANCE {
        KurtosisShape::Mesokurtic
    } else if g2 > 0.0 {
        KurtosisShape::Leptokurtic
    } else {
        KurtosisShape::Platykurtic
    }
}

/// Computes the full shape report for one column.
///
/// # Errors
///
/// As [`skewness`].
pub fn describe_shape(data: &[f64]) -> InferenceResult<ShapeSummary> {
    let (m2, mean) = spread(data, "shape summary")?;
    let m3 = moment_about(data, mean, 3);
    let m4 = moment_about(data, mean, 4);
    let g1 = m3 / m2.powf(1.5);
    let g2 = m4 / (m2 * m2) - 3.0;

    Ok(ShapeSummary {
        n: data.len(),
        mean,
        m2,
        m3,
        m4,
        skewness: g1,
        excess_kurtosis: g2,
        adjusted_skewness: adjusted_skewness(data)?,
        adjusted_excess_kurtosis: adjusted_excess_kurtosis(data)?,
        skewness_shape: skewness_shape(g1),
        kurtosis_shape: kurtosis_shape(g2),
    })
}

fn moment_about(data: &[f64], center: f64, k: u32) -> f64 {
    let sum: f64 = data.iter().map(|&x| (x - center).powi(k as i32)).sum();
    sum / data.len() as f64
}

// Returns (m2, mean) after checking n >= 2 and non-zero spread.
fn spread(data: &[f64], statistic: &'static str) -> InferenceResult<(f64, f64)> {
    ensure_len(data, 2, statistic)?;
    ensure_finite(data, "sample")?;
    let mean = stats::mean(data).ok_or(InferenceError::NonFinite { quantity: "sample" })?;
    let m2 = moment_about(data, mean, 2);
    let scale = data.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if is_negligible_spread(m2, scale) {
        return Err(InferenceError::DegenerateInput {
            statistic,
            quantity: "sample",
        });
    }
    Ok((m2, mean))
}

/// Constant samples can leave rounding residue in a centered second moment;
/// the residue's root is compared against the largest magnitude in the data.
pub(crate) fn is_negligible_spread(m2: f64, scale: f64) -> bool {
    m2 <= 0.0 || m2.sqrt() <= 1e-12 * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_moments_by_hand() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // mean 5, deviations -3,-1,-1,-1,0,0,2,4
        assert!((central_moment(&data, 1).unwrap()).abs() < 1e-12);
        assert!((central_moment(&data, 2).unwrap() - 4.0).abs() < 1e-12);
        assert!((central_moment(&data, 3).unwrap() - 5.25).abs() < 1e-12);
        assert!((central_moment(&data, 4).unwrap() - 44.5).abs() < 1e-12);
    }

    #[test]
    fn biased_and_bessel_variance_differ() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let biased = biased_variance(&data).unwrap();
        let unbiased = crate::sample::sample_variance(&data).unwrap();
        assert!((biased - 4.0).abs() < 1e-12);
        assert!((unbiased - biased * 8.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn skewness_and_kurtosis_by_hand() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let g1 = skewness(&data).unwrap();
        let g2 = excess_kurtosis(&data).unwrap();
        assert!((g1 - 5.25 / 8.0).abs() < 1e-12, "g1 = {g1}");
        assert!((g2 - (44.5 / 16.0 - 3.0)).abs() < 1e-12, "g2 = {g2}");
    }

    #[test]
    fn symmetric_sample_has_zero_skew() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let g1 = skewness(&data).unwrap();
        assert!(g1.abs() < 1e-12);
        assert_eq!(skewness_shape(g1), SkewnessShape::ApproximatelySymmetric);
        // uniform-like spread is flatter than normal
        let g2 = excess_kurtosis(&data).unwrap();
        assert!((g2 - (-1.3)).abs() < 1e-12, "g2 = {g2}");
        assert_eq!(kurtosis_shape(g2), KurtosisShape::Platykurtic);
    }

    #[test]
    fn constant_sample_is_degenerate() {
        let data = [0.1, 0.1, 0.1, 0.1];
        assert!(matches!(
            skewness(&data),
            Err(InferenceError::DegenerateInput { .. })
        ));
        assert!(matches!(
            excess_kurtosis(&data),
            Err(InferenceError::DegenerateInput { .. })
        ));
        assert!(adjusted_excess_kurtosis(&data).is_err());
    }

    #[test]
    fn too_short_samples() {
        assert!(matches!(
            skewness(&[1.0]),
            Err(InferenceError::InsufficientData { required: 2, .. })
        ));
        assert!(central_moment(&[], 2).is_err());
        assert_eq!(central_moment(&[3.0], 2).unwrap(), 0.0);
        assert!(biased_variance(&[3.0]).is_err());
    }

    #[test]
    fn adjusted_definedness_thresholds() {
        assert_eq!(adjusted_skewness(&[1.0, 2.0]).unwrap(), None);
        assert!(adjusted_skewness(&[1.0, 2.0, 4.0]).unwrap().is_some());
        assert_eq!(adjusted_excess_kurtosis(&[1.0, 2.0, 4.0]).unwrap(), None);
        assert!(adjusted_excess_kurtosis(&[1.0, 2.0, 4.0, 8.0])
            .unwrap()
            .is_some());
    }

    #[test]
    fn adjusted_skewness_formula() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let g1 = skewness(&data).unwrap();
        let big_g1 = adjusted_skewness(&data).unwrap().unwrap();
        assert!((big_g1 - (56.0_f64).sqrt() / 6.0 * g1).abs() < 1e-12);

        let g2 = excess_kurtosis(&data).unwrap();
        let big_g2 = adjusted_excess_kurtosis(&data).unwrap().unwrap();
        assert!((big_g2 - 7.0 / 30.0 * (9.0 * g2 + 6.0)).abs() < 1e-12);
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(skewness_shape(0.05), SkewnessShape::ApproximatelySymmetric);
        assert_eq!(skewness_shape(-0.5), SkewnessShape::LeftSkewed);
        assert_eq!(kurtosis_shape(-0.09), KurtosisShape::Mesokurtic);
        assert_eq!(kurtosis_shape(1.2), KurtosisShape::Leptokurtic);
    }

    #[test]
    fn describe_shape_is_consistent() {
        let data = [61.2, 58.4, 63.9, 70.1, 55.0, 59.8, 62.3, 66.7, 57.5, 64.0];
        let s = describe_shape(&data).unwrap();
        assert_eq!(s.n, 10);
        assert!((s.skewness - skewness(&data).unwrap()).abs() < 1e-12);
        assert!((s.excess_kurtosis - excess_kurtosis(&data).unwrap()).abs() < 1e-12);
        assert!((s.m2 - biased_variance(&data).unwrap()).abs() < 1e-12);
        assert!(s.adjusted_skewness.is_some());
        assert!(s.adjusted_excess_kurtosis.is_some());
    }

    #[test]
    fn idempotent() {
        let data = [3.1, 4.7, 2.2, 9.9, 5.5, 6.1];
        let a = describe_shape(&data).unwrap();
        let b = describe_shape(&data).unwrap();
        assert_eq!(a.skewness.to_bits(), b.skewness.to_bits());
        assert_eq!(a.excess_kurtosis.to_bits(), b.excess_kurtosis.to_bits());
    }
}
