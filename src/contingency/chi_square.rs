//! Chi-square test of homogeneity.

#[cfg(feature = "serde")]
use serde::Serialize;
use u_numflow::special;

use super::table::ContingencyTable;
use crate::error::{ensure_probability, InferenceError, InferenceResult, ValidityWarning};

/// Expected count below which a cell weakens the chi-square approximation.
pub const MIN_EXPECTED_COUNT: f64 = 5.0;

/// Result of a chi-square homogeneity test.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChiSquareResult {
    /// Σ (O − E)² / E.
    pub statistic: f64,
    /// (rows − 1)(cols − 1).
    pub df: usize,
    /// Upper α quantile of χ²(df).
    pub critical_value: f64,
    /// P(χ²(df) ≥ statistic).
    pub p_value: f64,
    /// Significance level.
    pub alpha: f64,
    /// Smallest expected count.
    pub min_expected: f64,
    /// Cells with expected count below 5.
    pub cells_below_five: usize,
    /// statistic > critical_value.
    pub reject: bool,
    /// Row-major expected counts.
    pub expected: Vec<f64>,
    /// `LowExpectedCount` when any cell falls below 5.
    pub warnings: Vec<ValidityWarning>,
}

/// Pearson chi-square test that the category distribution is the same in
/// every row.
///
/// # Errors
///
/// - `LengthMismatch` for a hand-built table whose counts or labels do not
///   match its shape
/// - `InsufficientData` for fewer than 2 rows or columns
/// - `DegenerateInput` when a row or column total is zero
/// - `InvalidParameter` when α is outside (0, 1)
///
/// # Examples
///
/// ```
/// use u_inference::contingency::{chi_square_homogeneity, ContingencyTable};
///
/// let table = ContingencyTable::from_rows(&[vec![30.0, 10.0], vec![20.0, 40.0]]).unwrap();
/// let r = chi_square_homogeneity(&table, 0.05).unwrap();
/// assert!(r.reject);
/// assert!(r.p_value < 0.01);
/// ```
pub fn chi_square_homogeneity(
    table: &ContingencyTable,
    alpha: f64,
) -> InferenceResult<ChiSquareResult> {
    ensure_probability(alpha, "alpha")?;
    if !table.is_well_formed() {
        return Err(InferenceError::LengthMismatch {
            statistic: "chi-square homogeneity",
            left: table.n_rows.saturating_mul(table.n_cols),
            right: table.observed.len(),
        });
    }
    for dim in [table.n_rows, table.n_cols] {
        if dim < 2 {
            return Err(InferenceError::InsufficientData {
                statistic: "chi-square homogeneity",
                required: 2,
                actual: dim,
            });
        }
    }
    if table.row_totals().iter().any(|&r| r <= 0.0) {
        return Err(InferenceError::DegenerateInput {
            statistic: "chi-square homogeneity",
            quantity: "row total",
        });
    }
    if table.col_totals().iter().any(|&c| c <= 0.0) {
        return Err(InferenceError::DegenerateInput {
            statistic: "chi-square homogeneity",
            quantity: "column total",
        });
    }

    let expected = table.expected();
    let statistic: f64 = table
        .observed
        .iter()
        .zip(&expected)
        .map(|(&o, &e)| (o - e).powi(2) / e)
        .sum();

    let df = (table.n_rows - 1) * (table.n_cols - 1);
    let dff = df as f64;
    let p_value = if statistic <= 0.0 {
        1.0
    } else {
        (1.0 - special::chi_squared_cdf(statistic, dff)).clamp(0.0, 1.0)
    };
    let critical_value = chi_squared_quantile(1.0 - alpha, dff);

    let min_expected = expected.iter().copied().fold(f64::INFINITY, f64::min);
    let cells_below_five = expected.iter().filter(|&&e| e < MIN_EXPECTED_COUNT).count();

    let mut warnings = Vec::new();
    if cells_below_five > 0 {
        let w = ValidityWarning::LowExpectedCount {
            cells: cells_below_five,
            min_expected,
        };
        log::warn!("{w}");
        warnings.push(w);
    }

    log::debug!(
        "chi-square homogeneity: stat={statistic:.4} df={df} crit={critical_value:.4} p={p_value:.4}"
    );

    Ok(ChiSquareResult {
        statistic,
        df,
        critical_value,
        p_value,
        alpha,
        min_expected,
        cells_below_five,
        reject: statistic > critical_value,
        expected,
        warnings,
    })
}

/// Inverse chi-square CDF by bisection.
///
/// Brackets the root by doubling from max(df, 1), then halves the bracket
/// until it is relatively narrower than 1e-12.
pub(crate) fn chi_squared_quantile(p: f64, df: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    let mut lo = 0.0_f64;
    let mut hi = df.max(1.0);
    for _ in 0..1024 {
        if special::chi_squared_cdf(hi, df) >= p {
            break;
        }
        lo = hi;
        hi *= 2.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if special::chi_squared_cdf(mid, df) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= 1e-12 * hi.max(1.0) {
            break;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contingency::quantile_bin;

    fn table(rows: &[Vec<f64>]) -> ContingencyTable {
        ContingencyTable::from_rows(rows).unwrap()
    }

    #[test]
    fn balanced_table_has_zero_statistic() {
        let t = table(&[vec![25.0, 25.0], vec![25.0, 25.0]]);
        let r = chi_square_homogeneity(&t, 0.05).unwrap();
        assert!(r.statistic.abs() < 1e-12);
        assert_eq!(r.p_value, 1.0);
        assert_eq!(r.df, 1);
        assert!(!r.reject);
        assert!(r.warnings.is_empty());
        assert_eq!(r.expected, vec![25.0; 4]);
    }

    #[test]
    fn textbook_two_by_two() {
        // E = [20, 20, 30, 30]: χ² = 5 + 5 + 10/3 + 10/3
        let t = table(&[vec![30.0, 10.0], vec![20.0, 40.0]]);
        let r = chi_square_homogeneity(&t, 0.05).unwrap();
        assert!((r.statistic - 50.0 / 3.0).abs() < 1e-9);
        assert!(r.p_value < 1e-3);
        assert!(r.reject);
        assert_eq!(r.min_expected, 20.0);
        assert_eq!(r.cells_below_five, 0);
    }

    #[test]
    fn critical_values() {
        assert!((chi_squared_quantile(0.95, 1.0) - 3.8415).abs() < 1e-3);
        assert!((chi_squared_quantile(0.95, 2.0) - 5.9915).abs() < 1e-3);
        assert!((chi_squared_quantile(0.95, 10.0) - 18.307).abs() < 1e-2);
        assert!((chi_squared_quantile(0.99, 4.0) - 13.277).abs() < 1e-2);
        assert_eq!(chi_squared_quantile(0.0, 3.0), 0.0);
    }

    #[test]
    fn reject_matches_p_value() {
        let t = table(&[
            vec![12.0, 8.0, 5.0],
            vec![9.0, 11.0, 6.0],
            vec![4.0, 7.0, 14.0],
        ]);
        let r = chi_square_homogeneity(&t, 0.05).unwrap();
        assert_eq!(r.df, 4);
        assert_eq!(r.reject, r.p_value < 0.05);
    }

    #[test]
    fn sparse_cells_warn() {
        // E = [0.75, 2.25, 3.25, 9.75]
        let t = table(&[vec![1.0, 2.0], vec![3.0, 10.0]]);
        let r = chi_square_homogeneity(&t, 0.05).unwrap();
        assert_eq!(r.cells_below_five, 3);
        assert!((r.min_expected - 0.75).abs() < 1e-12);
        assert!(matches!(
            r.warnings.as_slice(),
            [ValidityWarning::LowExpectedCount { cells: 3, .. }]
        ));
    }

    #[test]
    fn malformed_table_is_an_error() {
        let mut t = table(&[vec![3.0, 4.0], vec![5.0, 6.0]]);
        t.observed.pop();
        assert!(matches!(
            chi_square_homogeneity(&t, 0.05),
            Err(InferenceError::LengthMismatch {
                left: 4,
                right: 3,
                ..
            })
        ));
        let mut t = table(&[vec![3.0, 4.0], vec![5.0, 6.0]]);
        t.n_rows = 3;
        assert!(chi_square_homogeneity(&t, 0.05).is_err());
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let values: Vec<f64> = (0..48).map(|i| f64::from((i * 37) % 48) * 0.25).collect();
        let grade: Vec<&str> = (0..48).map(|i| if i % 3 == 0 { "A" } else { "B" }).collect();
        let run = || {
            let bins = quantile_bin(&values, 4).unwrap();
            let t = ContingencyTable::cross_tabulate(&bins, &grade).unwrap();
            (bins, chi_square_homogeneity(&t, 0.05).unwrap())
        };
        let (bins_a, a) = run();
        let (bins_b, b) = run();
        assert_eq!(bins_a.edges, bins_b.edges);
        assert_eq!(bins_a.assignments, bins_b.assignments);
        assert_eq!(a.statistic.to_bits(), b.statistic.to_bits());
        assert_eq!(a.p_value.to_bits(), b.p_value.to_bits());
        assert_eq!(a.critical_value.to_bits(), b.critical_value.to_bits());
        assert_eq!(a.reject, b.reject);
    }

    #[test]
    fn edge_cases() {
        let zero_row = table(&[vec![0.0, 0.0], vec![5.0, 6.0]]);
        assert!(matches!(
            chi_square_homogeneity(&zero_row, 0.05),
            Err(InferenceError::DegenerateInput {
                quantity: "row total",
                ..
            })
        ));
        let zero_col = table(&[vec![0.0, 3.0], vec![0.0, 6.0]]);
        assert!(matches!(
            chi_square_homogeneity(&zero_col, 0.05),
            Err(InferenceError::DegenerateInput {
                quantity: "column total",
                ..
            })
        ));
        let single_row = table(&[vec![3.0, 4.0]]);
        assert!(matches!(
            chi_square_homogeneity(&single_row, 0.05),
            Err(InferenceError::InsufficientData { .. })
        ));
        let ok = table(&[vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert!(chi_square_homogeneity(&ok, 0.0).is_err());
    }
}
