//! Sample preparation and Bessel-corrected summaries.
//!
//! Missing entries are represented as `NaN`. The engines refuse non-finite
//! input, so callers clean columns here first.
//!
//! Variance convention: [`sample_variance`] divides by n − 1 and is what the
//! interval estimator uses. The divide-by-n moment lives in
//! [`crate::moments::biased_variance`]. The two are never interchanged.

use std::collections::BTreeMap;

use u_numflow::stats;

use crate::error::{ensure_finite, ensure_len, InferenceError, InferenceResult};

/// Drops missing (`NaN`) and infinite entries, keeping order.
///
/// # Examples
///
/// ```
/// use u_inference::sample::drop_missing;
///
/// let clean = drop_missing(&[1.0, f64::NAN, 3.0]);
/// assert_eq!(clean, vec![1.0, 3.0]);
/// ```
pub fn drop_missing(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Keeps only index-aligned pairs where both sides are present.
///
/// # Errors
///
/// [`InferenceError::LengthMismatch`] if the columns differ in length.
pub fn complete_pairs(x: &[f64], y: &[f64]) -> InferenceResult<(Vec<f64>, Vec<f64>)> {
    if x.len() != y.len() {
        return Err(InferenceError::LengthMismatch {
            statistic: "complete_pairs",
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip())
}

/// Arithmetic mean.
///
/// # Errors
///
/// `InsufficientData` for an empty sample, `NonFinite` for missing entries.
pub fn sample_mean(data: &[f64]) -> InferenceResult<f64> {
    ensure_len(data, 1, "mean")?;
    ensure_finite(data, "sample")?;
    stats::mean(data).ok_or(InferenceError::NonFinite { quantity: "sample" })
}

/// Sample variance with Bessel's correction (divide by n − 1).
///
/// # Errors
///
/// `InsufficientData` when n < 2, `NonFinite` for missing entries.
pub fn sample_variance(data: &[f64]) -> InferenceResult<f64> {
    ensure_len(data, 2, "sample variance")?;
    ensure_finite(data, "sample")?;
    stats::variance(data).ok_or(InferenceError::NonFinite { quantity: "sample" })
}

/// Sample standard deviation, √[`sample_variance`].
pub fn sample_std_dev(data: &[f64]) -> InferenceResult<f64> {
    sample_variance(data).map(f64::sqrt)
}

/// Frequency of each category label, sorted by label.
pub fn category_counts<S: AsRef<str>>(labels: &[S]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_ref().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts entries equal to `success` in a categorical flag column.
///
/// Returns `(n, successes)`, ready for
/// [`one_sided_lower_test`](crate::proportion::one_sided_lower_test).
///
/// # Examples
///
/// ```
/// use u_inference::sample::count_successes;
///
/// let defects = ["No", "Yes", "No", "No", "Yes"];
/// assert_eq!(count_successes(&defects, "Yes"), (5, 2));
/// ```
pub fn count_successes<S: AsRef<str>>(flags: &[S], success: &str) -> (usize, usize) {
    let hits = flags.iter().filter(|f| f.as_ref() == success).count();
    (flags.len(), hits)
}

/// Selects the values of `column` whose `group` label equals `label`.
///
/// Used to split a measurement column by shift or supplier before the
/// two-sample and proportion engines are called.
///
/// # Errors
///
/// [`InferenceError::LengthMismatch`] if the columns differ in length.
pub fn select_group<S: AsRef<str>>(
    column: &[f64],
    group: &[S],
    label: &str,
) -> InferenceResult<Vec<f64>> {
    if column.len() != group.len() {
        return Err(InferenceError::LengthMismatch {
            statistic: "select_group",
            left: column.len(),
            right: group.len(),
        });
    }
    Ok(column
        .iter()
        .zip(group.iter())
        .filter(|(_, g)| g.as_ref() == label)
        .map(|(&v, _)| v)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_missing_keeps_order() {
        let v = drop_missing(&[3.0, f64::NAN, 1.0, f64::INFINITY, 2.0]);
        assert_eq!(v, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn complete_pairs_drops_either_side() {
        let x = [1.0, f64::NAN, 3.0, 4.0];
        let y = [2.0, 5.0, f64::NAN, 8.0];
        let (cx, cy) = complete_pairs(&x, &y).expect("aligned");
        assert_eq!(cx, vec![1.0, 4.0]);
        assert_eq!(cy, vec![2.0, 8.0]);
        assert!(complete_pairs(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn bessel_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let v = sample_variance(&data).expect("n >= 2");
        assert!((v - 32.0 / 7.0).abs() < 1e-12, "var = {v}");
        assert!((sample_mean(&data).expect("mean") - 5.0).abs() < 1e-12);
    }

    #[test]
    fn variance_needs_two() {
        assert!(matches!(
            sample_variance(&[1.0]),
            Err(InferenceError::InsufficientData { required: 2, .. })
        ));
        assert!(matches!(
            sample_mean(&[]),
            Err(InferenceError::InsufficientData { required: 1, .. })
        ));
        assert!(matches!(
            sample_variance(&[1.0, f64::NAN]),
            Err(InferenceError::NonFinite { .. })
        ));
    }

    #[test]
    fn counts_and_groups() {
        let supplier = ["B", "A", "A", "C", "A"];
        let counts = category_counts(&supplier);
        assert_eq!(counts["A"], 3);
        assert_eq!(counts.keys().next().map(String::as_str), Some("A"));

        let weight = [10.0, 11.0, 12.0, 13.0, 14.0];
        let a = select_group(&weight, &supplier, "A").expect("aligned");
        assert_eq!(a, vec![11.0, 12.0, 14.0]);
    }
}
