//! Heteroscedasticity checks.

use u_numflow::special;

use super::{HeteroscedasticityTest, TestStatistic};
use crate::error::{ensure_same_len, InferenceResult};
use crate::regression;

/// Breusch–Pagan LM test for residual variance that depends on the regressor.
///
/// Auxiliary regression of e² on x; LM = n·R²_aux, asymptotically χ² with
/// one degree of freedom for a single regressor.
///
/// Fails with `DegenerateInput` when every squared residual is identical,
/// since the auxiliary R² is then undefined.
///
/// # References
///
/// Breusch & Pagan (1979). "A simple test for heteroscedasticity and random
/// coefficient variation". Econometrica, 47(5), 1287–1294.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreuschPagan;

impl HeteroscedasticityTest for BreuschPagan {
    fn name(&self) -> &'static str {
        "Breusch-Pagan"
    }

    fn test(&self, residuals: &[f64], regressor: &[f64]) -> InferenceResult<TestStatistic> {
        ensure_same_len(residuals, regressor, "Breusch-Pagan")?;
        let squared: Vec<f64> = residuals.iter().map(|e| e * e).collect();
        let aux = regression::fit(regressor, &squared)?;

        let lm = aux.n as f64 * aux.r_squared;
        let p_value = (1.0 - special::chi_squared_cdf(lm, 1.0)).clamp(0.0, 1.0);
        log::debug!("Breusch-Pagan: LM={lm:.4} aux R2={:.4} p={p_value:.4}", aux.r_squared);

        Ok(TestStatistic {
            statistic: lm,
            df: Some(1.0),
            p_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;

    #[test]
    fn lm_is_n_times_auxiliary_r_squared() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let e = [0.1, -0.2, 0.3, -0.5, 0.6, -0.9, 1.1, -1.4];
        let r = BreuschPagan.test(&e, &x).unwrap();
        let sq: Vec<f64> = e.iter().map(|v| v * v).collect();
        let aux = regression::fit(&x, &sq).unwrap();
        assert!((r.statistic - 8.0 * aux.r_squared).abs() < 1e-12);
        assert_eq!(r.df, Some(1.0));
    }

    #[test]
    fn fanning_residuals_are_flagged() {
        let x: Vec<f64> = (1..=40).map(f64::from).collect();
        let e: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| if i % 2 == 0 { 0.1 * xi } else { -0.1 * xi })
            .collect();
        let r = BreuschPagan.test(&e, &x).unwrap();
        assert!(r.p_value < 0.01, "p = {}", r.p_value);
    }

    #[test]
    fn stable_spread_is_not_flagged() {
        let x: Vec<f64> = (1..=40).map(f64::from).collect();
        let pattern = [0.5, -1.0, 1.0, -0.5];
        let e: Vec<f64> = (0..40).map(|i| pattern[i % 4]).collect();
        let r = BreuschPagan.test(&e, &x).unwrap();
        assert!(r.p_value > 0.05, "p = {}", r.p_value);
    }

    #[test]
    fn edge_cases() {
        assert!(matches!(
            BreuschPagan.test(&[1.0, -1.0, 1.0, -1.0], &[1.0, 2.0, 3.0, 4.0]),
            Err(InferenceError::DegenerateInput { .. })
        ));
        assert!(matches!(
            BreuschPagan.test(&[0.1, 0.2], &[1.0, 2.0, 3.0]),
            Err(InferenceError::LengthMismatch { .. })
        ));
    }
}
