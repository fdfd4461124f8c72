//! Normality tests for regression residuals.
//!
//! # References
//!
//! - Shapiro & Wilk (1965). "An analysis of variance test for normality".
//!   Biometrika, 52(3–4), 591–611.
//! - Royston (1995). "Remark AS R94: A remark on Algorithm AS 181".
//!   Applied Statistics, 44(4), 547–551.
//! - Jarque & Bera (1987). "A test for normality of observations and
//!   regression residuals". International Statistical Review, 55(2), 163–172.

use u_numflow::special;

use super::{NormalityTest, TestStatistic};
use crate::error::{ensure_finite, InferenceError, InferenceResult};
use crate::moments;

/// Largest sample accepted by [`ShapiroWilk`].
pub const SHAPIRO_WILK_MAX_N: usize = 5000;

/// Shapiro–Wilk W test using Royston's AS R94 approximation.
///
/// Supports n = 3..=5000. W close to 1 suggests normality; the p-value comes
/// from Royston's normalizing transformation of ln(1 − W).
///
/// # Examples
///
/// ```
/// use u_inference::diagnostics::{NormalityTest, ShapiroWilk};
///
/// let residuals = [-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5];
/// let r = ShapiroWilk.test(&residuals).unwrap();
/// assert!(r.statistic > 0.9);
/// assert!(r.p_value > 0.05);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapiroWilk;

/// Jarque–Bera test: JB = (n/6)·(g1² + g2²/4) ~ χ²(2).
///
/// Built on the biased moment estimators of [`crate::moments`]. Asymptotic;
/// requires n ≥ 8.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarqueBera;

impl NormalityTest for ShapiroWilk {
    fn name(&self) -> &'static str {
        "Shapiro-Wilk"
    }

    fn test(&self, data: &[f64]) -> InferenceResult<TestStatistic> {
        let n = data.len();
        if n < 3 {
            return Err(InferenceError::InsufficientData {
                statistic: "Shapiro-Wilk",
                required: 3,
                actual: n,
            });
        }
        if n > SHAPIRO_WILK_MAX_N {
            return Err(InferenceError::InvalidParameter {
                parameter: "sample size",
                value: n as f64,
                constraint: "at most 5000 for Shapiro-Wilk",
            });
        }
        ensure_finite(data, "residuals")?;

        let mut x = data.to_vec();
        x.sort_by(|a, b| a.total_cmp(b));

        let mean = x.iter().sum::<f64>() / n as f64;
        let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
        let scale = x[0].abs().max(x[n - 1].abs());
        if x[n - 1] - x[0] <= 1e-12 * scale || ss <= 0.0 {
            return Err(InferenceError::DegenerateInput {
                statistic: "Shapiro-Wilk",
                quantity: "residuals",
            });
        }

        let (w, p_value) = if n == 3 {
            // exact distribution: a = (1/√2, 0, −1/√2)
            let num = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
            let w = (num * num / ss).clamp(0.75, 1.0);
            let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
            (w, p)
        } else {
            let a = royston_coefficients(n).ok_or(InferenceError::DegenerateInput {
                statistic: "Shapiro-Wilk",
                quantity: "order-statistic coefficients",
            })?;
            let sa: f64 = a
                .iter()
                .enumerate()
                .map(|(i, &ai)| ai * (x[n - 1 - i] - x[i]))
                .sum();
            let w = (sa * sa / ss).min(1.0);
            (w, royston_p_value(w, n))
        };

        Ok(TestStatistic {
            statistic: w,
            df: None,
            p_value: p_value.clamp(0.0, 1.0),
        })
    }
}

impl NormalityTest for JarqueBera {
    fn name(&self) -> &'static str {
        "Jarque-Bera"
    }

    fn test(&self, data: &[f64]) -> InferenceResult<TestStatistic> {
        if data.len() < 8 {
            return Err(InferenceError::InsufficientData {
                statistic: "Jarque-Bera",
                required: 8,
                actual: data.len(),
            });
        }
        let g1 = moments::skewness(data)?;
        let g2 = moments::excess_kurtosis(data)?;
        let jb = data.len() as f64 / 6.0 * (g1 * g1 + g2 * g2 / 4.0);
        let p_value = (1.0 - special::chi_squared_cdf(jb, 2.0)).clamp(0.0, 1.0);
        Ok(TestStatistic {
            statistic: jb,
            df: Some(2.0),
            p_value,
        })
    }
}

// AS R94 polynomial coefficients
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// c[0] + c[1]·x + c[2]·x² + …
fn horner(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Antisymmetric weights a_1..a_{n/2} for the lower half of the order
/// statistics, from Blom scores with polynomial corrections to the
/// outermost one (n ≤ 5) or two (n > 5) weights.
fn royston_coefficients(n: usize) -> Option<Vec<f64>> {
    let half = n / 2;
    let nf = n as f64;
    let m: Vec<f64> = (0..half)
        .map(|i| special::inverse_normal_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a1 = horner(&C1, rsn) - m[0] / ssumm2;
    let corrected: Vec<f64> = if n <= 5 {
        vec![a1]
    } else {
        vec![a1, horner(&C2, rsn) - m[1] / ssumm2]
    };

    let k = corrected.len();
    let fac_sq = summ2 - 2.0 * m[..k].iter().map(|v| v * v).sum::<f64>();
    let rest = 1.0 - 2.0 * corrected.iter().map(|v| v * v).sum::<f64>();
    if fac_sq <= 0.0 || rest <= 0.0 {
        return None;
    }
    let fac = (fac_sq / rest).sqrt();

    let mut a = corrected;
    a.extend(m[k..].iter().map(|&mi| -mi / fac));
    Some(a)
}

/// Upper-tail p-value of W via Royston's normalization of ln(1 − W).
fn royston_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    let (z_input, m, s) = if n <= 11 {
        let gamma = horner(&G, nf);
        if y >= gamma {
            return 0.0;
        }
        (-(gamma - y).ln(), horner(&C3, nf), horner(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (y, horner(&C5, ln_n), horner(&C6, ln_n).exp())
    };

    1.0 - special::standard_normal_cdf((z_input - m) / s)
}
