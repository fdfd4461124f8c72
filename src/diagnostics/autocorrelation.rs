//! First-order autocorrelation of ordered residuals.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{ensure_finite, ensure_len, InferenceError, InferenceResult};

/// Below this Durbin–Watson value residuals are labelled positively correlated.
pub const DW_POSITIVE_BELOW: f64 = 1.5;
/// Above this Durbin–Watson value residuals are labelled negatively correlated.
pub const DW_NEGATIVE_ABOVE: f64 = 2.5;

/// Descriptive reading of a Durbin–Watson statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Autocorrelation {
    /// d < 1.5.
    Positive,
    /// 1.5 ≤ d ≤ 2.5.
    NoAutocorrelation,
    /// d > 2.5.
    Negative,
}

impl Autocorrelation {
    /// Labels a Durbin–Watson statistic.
    pub fn from_statistic(d: f64) -> Self {
        if d < DW_POSITIVE_BELOW {
            Self::Positive
        } else if d > DW_NEGATIVE_ABOVE {
            Self::Negative
        } else {
            Self::NoAutocorrelation
        }
    }
}

/// Durbin–Watson statistic with its label.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DurbinWatsonReport {
    /// d ∈ [0, 4].
    pub statistic: f64,
    /// Reading of `statistic`.
    pub autocorrelation: Autocorrelation,
}

/// d = Σᵢ₌₂ⁿ (eᵢ − eᵢ₋₁)² / Σᵢ₌₁ⁿ eᵢ².
///
/// Residuals must be in observation order.
///
/// # Errors
///
/// `InsufficientData` for n < 2; `DegenerateInput` when every residual is
/// zero.
///
/// # Examples
///
/// ```
/// use u_inference::diagnostics::{durbin_watson, Autocorrelation};
///
/// let alternating = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
/// let report = durbin_watson(&alternating).unwrap();
/// assert_eq!(report.autocorrelation, Autocorrelation::Negative);
/// ```
pub fn durbin_watson(residuals: &[f64]) -> InferenceResult<DurbinWatsonReport> {
    ensure_len(residuals, 2, "Durbin-Watson")?;
    ensure_finite(residuals, "residuals")?;

    let denom: f64 = residuals.iter().map(|e| e * e).sum();
    if denom <= 0.0 {
        return Err(InferenceError::DegenerateInput {
            statistic: "Durbin-Watson",
            quantity: "residuals",
        });
    }
    let num: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let statistic = num / denom;

    Ok(DurbinWatsonReport {
        statistic,
        autocorrelation: Autocorrelation::from_statistic(statistic),
    })
}
