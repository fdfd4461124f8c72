//! Simple bivariate OLS regression.
//!
//! Closed-form fit of y = β₀ + β₁·x from the centered sums Sxx, Syy, Sxy,
//! with the ANOVA decomposition SST = SSR + SSE, residual variance, R², and
//! coefficient t-tests.
//!
//! # Examples
//!
//! ```
//! use u_inference::regression::fit;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.1, 3.9, 6.1, 7.9, 10.1];
//! let result = fit(&x, &y).unwrap();
//! assert!((result.slope - 2.0).abs() < 0.1);
//! assert!((result.intercept - 0.1).abs() < 0.2);
//! assert!(result.r_squared > 0.99);
//! ```

#[cfg(feature = "serde")]
use serde::Serialize;
use u_numflow::special;

use crate::correlation::CrossProducts;
use crate::error::{InferenceError, InferenceResult};

/// Result of a simple linear regression: y = intercept + slope · x.
///
/// Constructed once per [`fit`] call and never mutated.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RegressionResult {
    /// Sample size.
    pub n: usize,
    /// Raw and centered sums of the pairs.
    pub sums: CrossProducts,
    /// x̄.
    pub mean_x: f64,
    /// ȳ.
    pub mean_y: f64,
    /// Sxx = Σx² − (Σx)²/n.
    pub sxx: f64,
    /// Syy = Σy² − (Σy)²/n.
    pub syy: f64,
    /// Sxy = Σxy − ΣxΣy/n.
    pub sxy: f64,
    /// Slope coefficient (β₁).
    pub slope: f64,
    /// Intercept (β₀).
    pub intercept: f64,
    /// Fitted values (ŷᵢ).
    pub fitted: Vec<f64>,
    /// Residuals (yᵢ - ŷᵢ).
    pub residuals: Vec<f64>,
    /// Total sum of squares, equal to Syy.
    pub sst: f64,
    /// Error sum of squares Σeᵢ².
    pub sse: f64,
    /// Regression sum of squares SST − SSE.
    pub ssr: f64,
    /// Coefficient of determination SSR/SST.
    pub r_squared: f64,
    /// Adjusted R² = 1 - (1-R²)(n-1)/(n-2).
    pub adjusted_r_squared: f64,
    /// Residual variance s² = SSE/(n−2).
    pub residual_variance: f64,
    /// Residual standard error s.
    pub residual_se: f64,
    /// Pearson r = Sxy/√(Sxx·Syy).
    pub pearson_r: f64,
    /// Standard error of the slope.
    pub slope_se: f64,
    /// Standard error of the intercept.
    pub intercept_se: f64,
    /// t-statistic for slope (H₀: β₁ = 0).
    pub slope_t: f64,
    /// t-statistic for intercept (H₀: β₀ = 0).
    pub intercept_t: f64,
    /// p-value for slope.
    pub slope_p: f64,
    /// p-value for intercept.
    pub intercept_p: f64,
    /// F-statistic (= t² for simple regression).
    pub f_statistic: f64,
    /// p-value for F-statistic.
    pub f_p_value: f64,
}

impl RegressionResult {
    /// Predicts y for new regressor values.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_inference::regression::fit;
    ///
    /// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    /// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
    /// let model = fit(&x, &y).unwrap();
    /// let pred = model.predict(&[6.0, 7.0]);
    /// assert!((pred[0] - 12.0).abs() < 1e-10);
    /// assert!((pred[1] - 14.0).abs() < 1e-10);
    /// ```
    pub fn predict(&self, x_new: &[f64]) -> Vec<f64> {
        x_new
            .iter()
            .map(|&xi| self.intercept + self.slope * xi)
            .collect()
    }

    /// Residual degrees of freedom, n − 2.
    pub fn residual_df(&self) -> usize {
        self.n - 2
    }
}

/// Fits y = β₀ + β₁·x by ordinary least squares.
///
/// # Algorithm
///
/// β₁ = Sxy / Sxx
/// β₀ = ȳ - β₁·x̄
///
/// SST = Syy, SSE = Σ(yᵢ − ŷᵢ)², SSR = SST − SSE, R² = SSR/SST.
///
/// # Errors
///
/// - `InsufficientData` if fewer than 3 pairs (n − 2 residual df must be > 0)
/// - `LengthMismatch` / `NonFinite` for malformed input
/// - `SingularDesign` if x has zero variance
/// - `DegenerateInput` if y has zero variance (R² undefined)
///
/// # References
///
/// Draper & Smith (1998). "Applied Regression Analysis", 3rd edition.
pub fn fit(x: &[f64], y: &[f64]) -> InferenceResult<RegressionResult> {
    let sums = CrossProducts::new(x, y)?;
    let n = sums.n;
    if n < 3 {
        return Err(InferenceError::InsufficientData {
            statistic: "ols fit",
            required: 3,
            actual: n,
        });
    }
    if sums.x_is_constant() {
        return Err(InferenceError::SingularDesign { quantity: "x" });
    }
    if sums.y_is_constant() {
        return Err(InferenceError::DegenerateInput {
            statistic: "r_squared",
            quantity: "y",
        });
    }

    let mean_x = sums.mean_x();
    let mean_y = sums.mean_y();
    let sxx = sums.sxx();
    let syy = sums.syy();
    let sxy = sums.sxy();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let fitted: Vec<f64> = x.iter().map(|&xi| mean_y + slope * (xi - mean_x)).collect();
    let residuals: Vec<f64> = y
        .iter()
        .zip(fitted.iter())
        .map(|(&yi, &fi)| yi - fi)
        .collect();

    let sst = syy;
    let sse: f64 = residuals.iter().map(|e| e * e).sum();
    let ssr = sst - sse;

    let nf = n as f64;
    let df_res = nf - 2.0;

    let r_squared = ssr / sst;
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / df_res;
    let pearson_r = sxy / (sxx * syy).sqrt();

    let residual_variance = sse / df_res;
    let residual_se = residual_variance.sqrt();

    let slope_se = (residual_variance / sxx).sqrt();
    let intercept_se = (residual_variance * (1.0 / nf + mean_x * mean_x / sxx)).sqrt();

    let slope_t = t_ratio(slope, slope_se);
    let intercept_t = t_ratio(intercept, intercept_se);
    let slope_p = two_sided_t_p(slope_t, df_res);
    let intercept_p = two_sided_t_p(intercept_t, df_res);

    // F = t² for a single regressor
    let f_statistic = slope_t * slope_t;
    let f_p_value = if f_statistic.is_infinite() {
        0.0
    } else {
        (1.0 - special::f_distribution_cdf(f_statistic, 1.0, df_res)).clamp(0.0, 1.0)
    };

    log::debug!(
        "ols fit: n={n} intercept={intercept:.6} slope={slope:.6} r2={r_squared:.4} s={residual_se:.4}"
    );

    Ok(RegressionResult {
        n,
        sums,
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
        slope,
        intercept,
        fitted,
        residuals,
        sst,
        sse,
        ssr,
        r_squared,
        adjusted_r_squared,
        residual_variance,
        residual_se,
        pearson_r,
        slope_se,
        intercept_se,
        slope_t,
        intercept_t,
        slope_p,
        intercept_p,
        f_statistic,
        f_p_value,
    })
}

fn t_ratio(estimate: f64, se: f64) -> f64 {
    if se > 1e-300 {
        estimate / se
    } else if estimate == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(estimate)
    }
}

fn two_sided_t_p(t: f64, df: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    (2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df))).clamp(0.0, 1.0)
}
