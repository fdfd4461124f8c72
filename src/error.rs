//! Error and warning types.
//!
//! Hard failures abort a single operation and name the offending statistic
//! and sample. Validity warnings are non-fatal: they travel inside the result
//! they qualify and are also emitted through the `log` facade.

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the inference engines.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[non_exhaustive]
pub enum InferenceError {
    /// A ratio needs positive variance but the sample is constant.
    #[error("degenerate input: {statistic} requires positive variance in {quantity}")]
    DegenerateInput {
        /// Statistic being computed.
        statistic: &'static str,
        /// Sample or derived quantity with zero spread.
        quantity: &'static str,
    },

    /// Sample size below the minimum for the requested statistic.
    #[error("insufficient data for {statistic}: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Statistic being computed.
        statistic: &'static str,
        /// Minimum number of observations.
        required: usize,
        /// Number of observations supplied.
        actual: usize,
    },

    /// Regressor has zero variance, so the OLS slope is undefined.
    #[error("singular design: regressor {quantity} has zero variance")]
    SingularDesign {
        /// Name of the regressor.
        quantity: &'static str,
    },

    /// A parameter lies outside its admissible range.
    #[error("invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name.
        parameter: &'static str,
        /// Value supplied.
        value: f64,
        /// Admissible range.
        constraint: &'static str,
    },

    /// Two sequences that must be aligned have different lengths.
    #[error("length mismatch in {statistic}: {left} vs {right}")]
    LengthMismatch {
        /// Statistic being computed.
        statistic: &'static str,
        /// Length of the first sequence.
        left: usize,
        /// Length of the second sequence.
        right: usize,
    },

    /// A sample contains NaN or infinite values.
    #[error("non-finite value in {quantity}; drop missing entries before computing")]
    NonFinite {
        /// Sample holding the value.
        quantity: &'static str,
    },
}

/// Result alias for inference operations.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Non-fatal caveat attached to a result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ValidityWarning {
    /// Some expected contingency counts fall below 5.
    LowExpectedCount {
        /// Number of cells with expected count < 5.
        cells: usize,
        /// Smallest expected count in the table.
        min_expected: f64,
    },
    /// Tied quantile edges were merged into fewer bins than requested.
    BinCollapse {
        /// Bins asked for.
        requested: usize,
        /// Bins actually produced.
        effective: usize,
    },
    /// A group is too small for the normal approximation to be reliable.
    SmallSample {
        /// Name of the group.
        sample: &'static str,
        /// Group size.
        n: usize,
    },
}

impl fmt::Display for ValidityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowExpectedCount {
                cells,
                min_expected,
            } => write!(
                f,
                "{cells} cell(s) have expected count below 5 (minimum {min_expected:.3}); \
                 the chi-square approximation may be poor"
            ),
            Self::BinCollapse {
                requested,
                effective,
            } => write!(
                f,
                "quantile ties merged bins: requested {requested}, produced {effective}"
            ),
            Self::SmallSample { sample, n } => write!(
                f,
                "{sample} has n = {n}; the normal approximation assumes roughly 30 or more"
            ),
        }
    }
}

pub(crate) fn ensure_finite(data: &[f64], quantity: &'static str) -> InferenceResult<()> {
    if data.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(InferenceError::NonFinite { quantity })
    }
}

pub(crate) fn ensure_len(
    data: &[f64],
    required: usize,
    statistic: &'static str,
) -> InferenceResult<()> {
    if data.len() < required {
        return Err(InferenceError::InsufficientData {
            statistic,
            required,
            actual: data.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_same_len(
    left: &[f64],
    right: &[f64],
    statistic: &'static str,
) -> InferenceResult<()> {
    if left.len() != right.len() {
        return Err(InferenceError::LengthMismatch {
            statistic,
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_probability(
    value: f64,
    parameter: &'static str,
) -> InferenceResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(InferenceError::InvalidParameter {
            parameter,
            value,
            constraint: "a value in (0, 1)",
        })
    }
}
