//! One-sample proportion test (lower-tailed z-test).
//!
//! H₀: p = p₀ against H₁: p < p₀. The standard error is evaluated under the
//! null value p₀, not under p̂.
//!
//! # Examples
//!
//! ```
//! use u_inference::proportion::one_sided_lower_test;
//!
//! // 10 defective out of 100, against a 15% benchmark
//! let r = one_sided_lower_test(100, 10, 0.15, 0.05).unwrap();
//! assert!((r.z_statistic + 1.4003).abs() < 1e-3);
//! assert!(!r.reject);
//! ```

#[cfg(feature = "serde")]
use serde::Serialize;
use u_numflow::special;

use crate::error::{ensure_probability, InferenceError, InferenceResult};

/// Result of a lower-tailed proportion test.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProportionTestResult {
    /// Sample size.
    pub n: usize,
    /// Number of successes.
    pub successes: usize,
    /// Sample proportion p̂ = x/n.
    pub p_hat: f64,
    /// Hypothesized proportion p₀.
    pub p0: f64,
    /// √(p₀(1−p₀)/n).
    pub std_error: f64,
    /// z = (p̂ − p₀)/SE₀.
    pub z_statistic: f64,
    /// α-quantile of the standard normal, reported for reference.
    pub z_critical: f64,
    /// Left-tail p-value Φ(z).
    pub p_value: f64,
    /// Significance level.
    pub alpha: f64,
    /// p-value < α.
    pub reject: bool,
}

/// Lower-tailed z-test for a single proportion.
///
/// # Algorithm
///
/// p̂ = x/n, SE₀ = √(p₀(1−p₀)/n), z = (p̂ − p₀)/SE₀,
/// p-value = Φ(z), z_crit = Φ⁻¹(α). H₀ is rejected iff p-value < α. The
/// decision is read off the p-value alone so the two reported quantities
/// cannot disagree when z sits on z_crit.
///
/// # Errors
///
/// - `InsufficientData` when n = 0
/// - `InvalidParameter` when successes > n, or p₀ or α is outside (0, 1)
pub fn one_sided_lower_test(
    n: usize,
    successes: usize,
    p0: f64,
    alpha: f64,
) -> InferenceResult<ProportionTestResult> {
    if n == 0 {
        return Err(InferenceError::InsufficientData {
            statistic: "proportion test",
            required: 1,
            actual: 0,
        });
    }
    if successes > n {
        return Err(InferenceError::InvalidParameter {
            parameter: "successes",
            value: successes as f64,
            constraint: "at most the sample size",
        });
    }
    ensure_probability(p0, "p0")?;
    ensure_probability(alpha, "alpha")?;

    let nf = n as f64;
    let p_hat = successes as f64 / nf;
    let std_error = (p0 * (1.0 - p0) / nf).sqrt();
    let z_statistic = (p_hat - p0) / std_error;
    let p_value = special::standard_normal_cdf(z_statistic).clamp(0.0, 1.0);
    let z_critical = special::inverse_normal_cdf(alpha);
    let reject = p_value < alpha;

    log::debug!(
        "proportion test: p_hat={p_hat:.4} p0={p0} z={z_statistic:.4} crit={z_critical:.4} p={p_value:.4}"
    );

    Ok(ProportionTestResult {
        n,
        successes,
        p_hat,
        p0,
        std_error,
        z_statistic,
        z_critical,
        p_value,
        alpha,
        reject,
    })
}
