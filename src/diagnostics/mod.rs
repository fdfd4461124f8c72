//! Residual diagnostics for a fitted simple regression.
//!
//! Three independent checks of the OLS assumptions:
//!
//! - [`BreuschPagan`] — residual variance depending on the regressor
//! - [`durbin_watson`] — first-order autocorrelation of ordered residuals
//! - [`ShapiroWilk`] — normality of residuals ([`JarqueBera`] as an alternative)
//!
//! The tests sit behind the [`NormalityTest`] and [`HeteroscedasticityTest`]
//! traits so [`RegressionDiagnostics`] can be configured with any
//! implementation. Reports describe the evidence at a given α; none of them
//! carries an accept/reject decision.
//!
//! # Examples
//!
//! ```
//! use u_inference::diagnostics::{Autocorrelation, RegressionDiagnostics};
//! use u_inference::regression::fit;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//! let model = fit(&x, &y).unwrap();
//! let diag = RegressionDiagnostics::default().run(&model, &x, 0.05).unwrap();
//! let dw = diag.autocorrelation.unwrap();
//! assert_eq!(dw.autocorrelation, Autocorrelation::NoAutocorrelation);
//! ```

mod autocorrelation;
mod heteroscedasticity;
mod normality;

pub use autocorrelation::{
    durbin_watson, Autocorrelation, DurbinWatsonReport, DW_NEGATIVE_ABOVE, DW_POSITIVE_BELOW,
};
pub use heteroscedasticity::BreuschPagan;
pub use normality::{JarqueBera, ShapiroWilk, SHAPIRO_WILK_MAX_N};

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{ensure_probability, ensure_same_len, InferenceResult};
use crate::regression::RegressionResult;

/// Statistic and p-value of a single hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TestStatistic {
    /// Test statistic.
    pub statistic: f64,
    /// Degrees of freedom of the reference distribution, if any.
    pub df: Option<f64>,
    /// p-value.
    pub p_value: f64,
}

/// A test of H₀: the sample comes from a normal distribution.
pub trait NormalityTest: Send + Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Runs the test on `data`.
    fn test(&self, data: &[f64]) -> InferenceResult<TestStatistic>;
}

/// A test of H₀: residual variance does not depend on the regressor.
pub trait HeteroscedasticityTest: Send + Sync {
    /// Display name.
    fn name(&self) -> &'static str;

    /// Runs the test on index-aligned residuals and regressor values.
    fn test(&self, residuals: &[f64], regressor: &[f64]) -> InferenceResult<TestStatistic>;
}

/// Reading of a normality test at α.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum NormalityEvidence {
    /// p ≥ α.
    ConsistentWithNormal,
    /// p < α.
    DepartsFromNormal,
}

/// Reading of a heteroscedasticity test at α.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum VarianceEvidence {
    /// p ≥ α.
    ConstantVariance,
    /// p < α.
    NonConstantVariance,
}

/// Normality check on the residuals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NormalityReport {
    /// Test used.
    pub test: &'static str,
    /// Statistic and p-value.
    pub outcome: TestStatistic,
    /// Level the evidence is read at.
    pub alpha: f64,
    /// Descriptive reading.
    pub evidence: NormalityEvidence,
}

/// Heteroscedasticity check on the residuals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HeteroscedasticityReport {
    /// Test used.
    pub test: &'static str,
    /// Statistic and p-value.
    pub outcome: TestStatistic,
    /// Level the evidence is read at.
    pub alpha: f64,
    /// Descriptive reading.
    pub evidence: VarianceEvidence,
}

/// Outcome of the three residual checks.
///
/// Each check is its own result: a failure in one (say, a constant squared
/// residual series for Breusch–Pagan) leaves the others intact.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DiagnosticsResult {
    /// Variance check.
    pub heteroscedasticity: InferenceResult<HeteroscedasticityReport>,
    /// Durbin–Watson check.
    pub autocorrelation: InferenceResult<DurbinWatsonReport>,
    /// Normality check.
    pub normality: InferenceResult<NormalityReport>,
}

/// Configurable runner for the residual checks.
///
/// Defaults to [`ShapiroWilk`] and [`BreuschPagan`].
pub struct RegressionDiagnostics {
    normality: Box<dyn NormalityTest>,
    heteroscedasticity: Box<dyn HeteroscedasticityTest>,
}

impl Default for RegressionDiagnostics {
    fn default() -> Self {
        Self {
            normality: Box::new(ShapiroWilk),
            heteroscedasticity: Box::new(BreuschPagan),
        }
    }
}

impl fmt::Debug for RegressionDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegressionDiagnostics")
            .field("normality", &self.normality.name())
            .field("heteroscedasticity", &self.heteroscedasticity.name())
            .finish()
    }
}

impl RegressionDiagnostics {
    /// Replaces the normality test.
    pub fn with_normality_test(mut self, test: impl NormalityTest + 'static) -> Self {
        self.normality = Box::new(test);
        self
    }

    /// Replaces the heteroscedasticity test.
    pub fn with_heteroscedasticity_test(
        mut self,
        test: impl HeteroscedasticityTest + 'static,
    ) -> Self {
        self.heteroscedasticity = Box::new(test);
        self
    }

    /// Runs all three checks on `fit`'s residuals.
    ///
    /// `regressor` is the x column the model was fitted on, in the same order.
    ///
    /// # Errors
    ///
    /// Only for caller mistakes: `InvalidParameter` for α outside (0, 1),
    /// `LengthMismatch` when `regressor` does not align with the residuals.
    /// Failures of individual checks are reported inside the result.
    pub fn run(
        &self,
        fit: &RegressionResult,
        regressor: &[f64],
        alpha: f64,
    ) -> InferenceResult<DiagnosticsResult> {
        ensure_probability(alpha, "alpha")?;
        ensure_same_len(&fit.residuals, regressor, "regression diagnostics")?;
        let residuals = fit.residuals.as_slice();

        let heteroscedasticity = self
            .heteroscedasticity
            .test(residuals, regressor)
            .map(|outcome| HeteroscedasticityReport {
                test: self.heteroscedasticity.name(),
                outcome,
                alpha,
                evidence: if outcome.p_value < alpha {
                    VarianceEvidence::NonConstantVariance
                } else {
                    VarianceEvidence::ConstantVariance
                },
            });

        let autocorrelation = durbin_watson(residuals);

        let normality = self.normality.test(residuals).map(|outcome| NormalityReport {
            test: self.normality.name(),
            outcome,
            alpha,
            evidence: if outcome.p_value < alpha {
                NormalityEvidence::DepartsFromNormal
            } else {
                NormalityEvidence::ConsistentWithNormal
            },
        });

        for (check, outcome) in [
            ("heteroscedasticity", heteroscedasticity.as_ref().err()),
            ("autocorrelation", autocorrelation.as_ref().err()),
            ("normality", normality.as_ref().err()),
        ] {
            if let Some(e) = outcome {
                log::warn!("{check} check unavailable: {e}");
            }
        }

        Ok(DiagnosticsResult {
            heteroscedasticity,
            autocorrelation,
            normality,
        })
    }
}
