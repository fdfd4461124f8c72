//! Configuration-bound entry point to the engines.
//!
//! [`Toolkit`] holds a validated [`InferenceConfig`] and forwards its
//! confidence level, α, bin count and hypothesized proportion to the
//! stateless engine functions, so a report pipeline sets them once.
//!
//! # Examples
//!
//! ```
//! use u_inference::{InferenceConfig, Toolkit};
//!
//! let toolkit = Toolkit::new(InferenceConfig::default()).unwrap();
//! let test = toolkit.proportion_test(100, 10).unwrap();
//! assert!(!test.reject);
//! ```

use crate::config::InferenceConfig;
use crate::contingency::{self, HomogeneityAnalysis};
use crate::correlation::{self, CorrelationCI, CorrelationResult};
use crate::diagnostics::{DiagnosticsResult, RegressionDiagnostics};
use crate::error::InferenceResult;
use crate::interval::{self, IntervalEstimate};
use crate::moments::{self, ShapeSummary};
use crate::proportion::{self, ProportionTestResult};
use crate::regression::{self, RegressionResult};

/// Engines bound to one set of analysis options.
#[derive(Debug)]
pub struct Toolkit {
    config: InferenceConfig,
    diagnostics: RegressionDiagnostics,
}

impl Toolkit {
    /// Validates `config` and binds it.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` from [`InferenceConfig::validate`].
    pub fn new(config: InferenceConfig) -> InferenceResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            diagnostics: RegressionDiagnostics::default(),
        })
    }

    /// Replaces the residual diagnostics runner.
    pub fn with_diagnostics(mut self, diagnostics: RegressionDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The bound options.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Moments and shape labels of one column.
    pub fn describe(&self, data: &[f64]) -> InferenceResult<ShapeSummary> {
        moments::describe_shape(data)
    }

    /// Pearson r with its Fisher interval at the configured confidence.
    pub fn correlate(
        &self,
        x: &[f64],
        y: &[f64],
    ) -> InferenceResult<(CorrelationResult, CorrelationCI)> {
        let r = correlation::pearson(x, y)?;
        let ci = correlation::correlation_ci(r.r, r.n, self.config.confidence_level)?;
        Ok((r, ci))
    }

    /// OLS fit of y on x.
    pub fn fit(&self, x: &[f64], y: &[f64]) -> InferenceResult<RegressionResult> {
        regression::fit(x, y)
    }

    /// Interval for one mean at the configured confidence.
    pub fn mean_interval(&self, data: &[f64]) -> InferenceResult<IntervalEstimate> {
        interval::mean_interval(data, self.config.confidence_level)
    }

    /// Interval for μ_a − μ_b at the configured confidence.
    pub fn mean_difference_interval(
        &self,
        a: &[f64],
        b: &[f64],
    ) -> InferenceResult<IntervalEstimate> {
        interval::mean_difference_interval(a, b, self.config.confidence_level)
    }

    /// Lower-tailed test of the configured p₀ at the configured α.
    pub fn proportion_test(
        &self,
        n: usize,
        successes: usize,
    ) -> InferenceResult<ProportionTestResult> {
        proportion::one_sided_lower_test(
            n,
            successes,
            self.config.hypothesized_proportion,
            self.config.alpha,
        )
    }

    /// Homogeneity of `categories` across the configured number of quantile
    /// bins of `values`.
    pub fn homogeneity_test<S: AsRef<str>>(
        &self,
        values: &[f64],
        categories: &[S],
    ) -> InferenceResult<HomogeneityAnalysis> {
        contingency::homogeneity_test(
            values,
            categories,
            self.config.quantile_bins,
            self.config.alpha,
        )
    }

    /// Residual diagnostics of `fit` read at the configured α.
    pub fn diagnose(
        &self,
        fit: &RegressionResult,
        regressor: &[f64],
    ) -> InferenceResult<DiagnosticsResult> {
        self.diagnostics.run(fit, regressor, self.config.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::JarqueBera;
    use crate::error::InferenceError;

    #[test]
    fn rejects_invalid_config() {
        let bad = InferenceConfig::default().with_alpha(0.0);
        assert!(matches!(
            Toolkit::new(bad),
            Err(InferenceError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn forwards_configured_levels() {
        let toolkit = Toolkit::new(InferenceConfig::strict()).unwrap();
        let data = [10.2, 9.8, 10.5, 10.1, 9.9, 10.4];
        let ci = toolkit.mean_interval(&data).unwrap();
        assert_eq!(ci.confidence, 0.99);
        assert!((ci.z_critical - 2.5758).abs() < 1e-3);

        let p = toolkit.proportion_test(100, 10).unwrap();
        assert_eq!(p.alpha, 0.01);
        assert_eq!(p.p0, 0.15);
    }

    #[test]
    fn end_to_end_report() {
        let toolkit = Toolkit::new(InferenceConfig::default()).unwrap();
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];

        let model = toolkit.fit(&x, &y).unwrap();
        assert!((model.slope - 0.6).abs() < 1e-12);
        let diag = toolkit.diagnose(&model, &x).unwrap();
        assert!(diag.autocorrelation.is_ok());

        let (r, ci) = toolkit.correlate(&x, &y).unwrap();
        assert!((r.r * r.r - model.r_squared).abs() < 1e-12);
        assert!(ci.lower < r.r && r.r < ci.upper);

        let shape = toolkit.describe(&y).unwrap();
        assert_eq!(shape.n, 5);

        let a = [10.0, 12.0, 11.0, 13.0, 12.0];
        let b = [20.0, 19.0, 21.0, 20.0, 22.0];
        let diff = toolkit.mean_difference_interval(&a, &b).unwrap();
        assert!((diff.estimate + 8.8).abs() < 1e-12);
    }

    #[test]
    fn homogeneity_uses_configured_bins() {
        let toolkit = Toolkit::new(InferenceConfig::default().with_quantile_bins(3)).unwrap();
        let values: Vec<f64> = (0..60).map(f64::from).collect();
        let grade: Vec<&str> = (0..60).map(|i| if i % 2 == 0 { "A" } else { "B" }).collect();
        let h = toolkit.homogeneity_test(&values, &grade).unwrap();
        assert_eq!(h.bins.requested, 3);
        assert_eq!(h.result.alpha, 0.05);
    }

    #[test]
    fn custom_diagnostics_runner() {
        let toolkit = Toolkit::new(InferenceConfig::default())
            .unwrap()
            .with_diagnostics(RegressionDiagnostics::default().with_normality_test(JarqueBera));
        let x: Vec<f64> = (1..=12).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 2.0 * v + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();
        let model = toolkit.fit(&x, &y).unwrap();
        let diag = toolkit.diagnose(&model, &x).unwrap();
        assert_eq!(diag.normality.unwrap().test, "Jarque-Bera");
    }
}
