//! Pearson correlation.
//!
//! Built on the [`CrossProducts`] sums that the OLS engine also consumes, so
//! r computed here and r derived from a fit agree to rounding.
//!
//! # Examples
//!
//! ```
//! use u_inference::correlation::pearson;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 5.0, 4.0, 5.0];
//!
//! let p = pearson(&x, &y).unwrap();
//! assert!(p.r > 0.7);
//! assert!(p.p_value < 0.2);
//! ```

#[cfg(feature = "serde")]
use serde::Serialize;
use u_numflow::special;

use crate::config::z_critical;
use crate::error::{
    ensure_finite, ensure_probability, ensure_same_len, InferenceError, InferenceResult,
};
use crate::moments::is_negligible_spread;

/// Raw and centered sums for a paired sample.
///
/// The centered sums are accumulated about the means in a second pass, so
/// they stay accurate when the data sit far from zero (a regressor recorded
/// as a timestamp or a large batch number, say).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CrossProducts {
    /// Number of pairs.
    pub n: usize,
    /// Σx.
    pub sum_x: f64,
    /// Σy.
    pub sum_y: f64,
    /// Σx².
    pub sum_x2: f64,
    /// Σy².
    pub sum_y2: f64,
    /// Σxy.
    pub sum_xy: f64,
    ss_x: f64,
    ss_y: f64,
    sp_xy: f64,
    scale_x: f64,
    scale_y: f64,
}

impl CrossProducts {
    /// Accumulates the sums over aligned pairs.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` or `NonFinite`.
    pub fn new(x: &[f64], y: &[f64]) -> InferenceResult<Self> {
        ensure_same_len(x, y, "cross products")?;
        ensure_finite(x, "x")?;
        ensure_finite(y, "y")?;

        let mut sums = Self {
            n: x.len(),
            sum_x: 0.0,
            sum_y: 0.0,
            sum_x2: 0.0,
            sum_y2: 0.0,
            sum_xy: 0.0,
            ss_x: 0.0,
            ss_y: 0.0,
            sp_xy: 0.0,
            scale_x: 0.0,
            scale_y: 0.0,
        };
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            sums.sum_x += xi;
            sums.sum_y += yi;
            sums.sum_x2 += xi * xi;
            sums.sum_y2 += yi * yi;
            sums.sum_xy += xi * yi;
            sums.scale_x = sums.scale_x.max(xi.abs());
            sums.scale_y = sums.scale_y.max(yi.abs());
        }
        if sums.n == 0 {
            return Ok(sums);
        }

        let (mx, my) = (sums.mean_x(), sums.mean_y());
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            let (dx, dy) = (xi - mx, yi - my);
            sums.ss_x += dx * dx;
            sums.ss_y += dy * dy;
            sums.sp_xy += dx * dy;
        }
        Ok(sums)
    }

    /// x̄.
    pub fn mean_x(&self) -> f64 {
        self.sum_x / self.n as f64
    }

    /// ȳ.
    pub fn mean_y(&self) -> f64 {
        self.sum_y / self.n as f64
    }

    /// Sxx = Σ(x − x̄)², equal to Σx² − (Σx)²/n.
    pub fn sxx(&self) -> f64 {
        self.ss_x
    }

    /// Syy = Σ(y − ȳ)², equal to Σy² − (Σy)²/n.
    pub fn syy(&self) -> f64 {
        self.ss_y
    }

    /// Sxy = Σ(x − x̄)(y − ȳ), equal to Σxy − ΣxΣy/n.
    pub fn sxy(&self) -> f64 {
        self.sp_xy
    }

    /// True when x has no spread beyond rounding of its magnitude.
    pub(crate) fn x_is_constant(&self) -> bool {
        is_negligible_spread(self.ss_x / self.n as f64, self.scale_x)
    }

    /// True when y has no spread beyond rounding of its magnitude.
    pub(crate) fn y_is_constant(&self) -> bool {
        is_negligible_spread(self.ss_y / self.n as f64, self.scale_y)
    }
}

/// Result of a correlation computation.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CorrelationResult {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// t = r·√(n−2)/√(1−r²).
    pub t_statistic: f64,
    /// Two-tailed p-value for H₀: ρ = 0.
    pub p_value: f64,
    /// Sample size.
    pub n: usize,
}

/// Confidence interval for a correlation coefficient.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CorrelationCI {
    /// Lower bound of the confidence interval.
    pub lower: f64,
    /// Upper bound of the confidence interval.
    pub upper: f64,
    /// Confidence level (e.g. 0.95).
    pub confidence: f64,
}

/// Computes the Pearson product-moment correlation and its significance.
///
/// # Algorithm
///
/// r = Sxy / √(Sxx·Syy)
///
/// p-value via t-test: t = r·√(n-2) / √(1-r²), df = n-2. For simple
/// regression this is the same test as H₀: β₁ = 0.
///
/// # Errors
///
/// `InsufficientData` when n < 3, `DegenerateInput` when either variable has
/// zero variance, `LengthMismatch`/`NonFinite` for malformed input.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
///
/// # Examples
///
/// ```
/// use u_inference::correlation::pearson;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [2.0, 4.0, 6.0, 8.0, 10.0];
/// let result = pearson(&x, &y).unwrap();
/// assert!((result.r - 1.0).abs() < 1e-10);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> InferenceResult<CorrelationResult> {
    let sums = CrossProducts::new(x, y)?;
    if sums.n < 3 {
        return Err(InferenceError::InsufficientData {
            statistic: "pearson correlation",
            required: 3,
            actual: sums.n,
        });
    }
    pearson_from_sums(&sums)
}

pub(crate) fn pearson_from_sums(sums: &CrossProducts) -> InferenceResult<CorrelationResult> {
    if sums.x_is_constant() {
        return Err(InferenceError::DegenerateInput {
            statistic: "pearson correlation",
            quantity: "x",
        });
    }
    if sums.y_is_constant() {
        return Err(InferenceError::DegenerateInput {
            statistic: "pearson correlation",
            quantity: "y",
        });
    }

    let r = (sums.sxy() / (sums.sxx() * sums.syy()).sqrt()).clamp(-1.0, 1.0);
    let (t_statistic, p_value) = correlation_t_test(r, sums.n);

    Ok(CorrelationResult {
        r,
        t_statistic,
        p_value,
        n: sums.n,
    })
}

/// Computes confidence interval for a Pearson correlation coefficient
/// using Fisher z-transformation.
///
/// # Errors
///
/// `InsufficientData` if n < 4, `InvalidParameter` if r is not in (-1, 1)
/// or confidence is not in (0, 1).
///
/// # Examples
///
/// ```
/// use u_inference::correlation::correlation_ci;
///
/// let ci = correlation_ci(0.8, 30, 0.95).unwrap();
/// assert!(ci.lower < 0.8 && ci.upper > 0.8);
/// assert!(ci.lower > 0.0 && ci.upper < 1.0);
/// ```
pub fn correlation_ci(r: f64, n: usize, confidence: f64) -> InferenceResult<CorrelationCI> {
    if n < 4 {
        return Err(InferenceError::InsufficientData {
            statistic: "correlation interval",
            required: 4,
            actual: n,
        });
    }
    if !(r > -1.0 && r < 1.0) {
        return Err(InferenceError::InvalidParameter {
            parameter: "r",
            value: r,
            constraint: "a value in (-1, 1)",
        });
    }
    ensure_probability(confidence, "confidence")?;

    let z = r.atanh();
    let se = 1.0 / (n as f64 - 3.0).sqrt();
    let z_crit = z_critical(confidence);

    Ok(CorrelationCI {
        lower: (z - z_crit * se).tanh(),
        upper: (z + z_crit * se).tanh(),
        confidence,
    })
}

fn correlation_t_test(r: f64, n: usize) -> (f64, f64) {
    let df = (n - 2) as f64;
    let r2 = r * r;

    // r = ±1 drives the denominator to zero
    if r2 >= 1.0 - 1e-15 {
        return (f64::INFINITY.copysign(r), 0.0);
    }

    let t = r * (df / (1.0 - r2)).sqrt();
    let p = 2.0 * (1.0 - special::t_distribution_cdf(t.abs(), df));
    (t, p.clamp(0.0, 1.0))
}
