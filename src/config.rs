//! Caller-facing analysis options.
//!
//! Collects the knobs that the engines otherwise take as explicit arguments:
//! confidence level for intervals, significance level for tests, the number
//! of quantile bins for contingency analysis, and the hypothesized proportion
//! for the lower-tailed proportion test.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use u_numflow::special;

use crate::error::{ensure_probability, InferenceError, InferenceResult};

/// Analysis options.
///
/// # Examples
///
/// ```
/// use u_inference::config::InferenceConfig;
///
/// let config = InferenceConfig::default();
/// assert_eq!(config.confidence_level, 0.95);
/// assert_eq!(config.quantile_bins, 6);
/// assert!((config.z_critical() - 1.96).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InferenceConfig {
    /// Confidence level for intervals, in (0, 1).
    pub confidence_level: f64,
    /// Significance level α for tests, in (0, 1).
    pub alpha: f64,
    /// Requested number of quantile bins for the homogeneity test.
    pub quantile_bins: usize,
    /// Hypothesized proportion p₀ for the lower-tailed proportion test.
    pub hypothesized_proportion: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            alpha: 0.05,
            quantile_bins: 6,
            hypothesized_proportion: 0.15,
        }
    }
}

impl InferenceConfig {
    /// 99% confidence and α = 0.01; other options at their defaults.
    pub fn strict() -> Self {
        Self {
            confidence_level: 0.99,
            alpha: 0.01,
            ..Self::default()
        }
    }

    /// Replaces the confidence level.
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Replaces the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Replaces the requested bin count.
    pub fn with_quantile_bins(mut self, quantile_bins: usize) -> Self {
        self.quantile_bins = quantile_bins;
        self
    }

    /// Replaces the hypothesized proportion.
    pub fn with_hypothesized_proportion(mut self, p0: f64) -> Self {
        self.hypothesized_proportion = p0;
        self
    }

    /// Checks every option against its admissible range.
    ///
    /// # Errors
    ///
    /// [`InferenceError::InvalidParameter`] naming the first offending option.
    pub fn validate(&self) -> InferenceResult<()> {
        ensure_probability(self.confidence_level, "confidence_level")?;
        ensure_probability(self.alpha, "alpha")?;
        ensure_probability(self.hypothesized_proportion, "hypothesized_proportion")?;
        if self.quantile_bins < 2 {
            return Err(InferenceError::InvalidParameter {
                parameter: "quantile_bins",
                value: self.quantile_bins as f64,
                constraint: "at least 2 bins",
            });
        }
        Ok(())
    }

    /// Two-sided normal critical value for the configured confidence level.
    pub fn z_critical(&self) -> f64 {
        z_critical(self.confidence_level)
    }
}

/// Two-sided standard normal critical value: Φ⁻¹(1 − (1 − c)/2).
pub(crate) fn z_critical(confidence_level: f64) -> f64 {
    special::inverse_normal_cdf(1.0 - (1.0 - confidence_level) / 2.0)
}
