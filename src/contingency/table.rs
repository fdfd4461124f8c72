//! Two-way contingency tables.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::binning::QuantileBins;
use crate::error::{ensure_finite, InferenceError, InferenceResult};

/// Observed counts with rows as value bins and columns as categories.
///
/// Counts are stored row-major: `observed[i * n_cols + j]`. The fields are
/// public for reporting; a table assembled by hand rather than through the
/// constructors can be checked with [`ContingencyTable::is_well_formed`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ContingencyTable {
    /// Row labels.
    pub row_labels: Vec<String>,
    /// Column labels.
    pub col_labels: Vec<String>,
    /// Row-major counts.
    pub observed: Vec<f64>,
    /// Number of rows.
    pub n_rows: usize,
    /// Number of columns.
    pub n_cols: usize,
}

impl ContingencyTable {
    /// Builds a table from labels and row-major counts.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` if `observed.len() != rows × cols`; `NonFinite` or
    /// `InvalidParameter` for a missing or negative count.
    pub fn new(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        observed: Vec<f64>,
    ) -> InferenceResult<Self> {
        let (n_rows, n_cols) = (row_labels.len(), col_labels.len());
        if observed.len() != n_rows * n_cols {
            return Err(InferenceError::LengthMismatch {
                statistic: "contingency table",
                left: n_rows * n_cols,
                right: observed.len(),
            });
        }
        ensure_finite(&observed, "observed counts")?;
        if let Some(&v) = observed.iter().find(|&&v| v < 0.0) {
            return Err(InferenceError::InvalidParameter {
                parameter: "observed count",
                value: v,
                constraint: "non-negative",
            });
        }
        Ok(Self {
            row_labels,
            col_labels,
            observed,
            n_rows,
            n_cols,
        })
    }

    /// Builds a table from nested rows, labelling rows and columns by index.
    ///
    /// # Errors
    ///
    /// As [`ContingencyTable::new`]; ragged rows give `LengthMismatch`.
    pub fn from_rows(rows: &[Vec<f64>]) -> InferenceResult<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let observed: Vec<f64> = rows.iter().flatten().copied().collect();
        let row_labels = (0..rows.len()).map(|i| i.to_string()).collect();
        let col_labels = (0..n_cols).map(|j| j.to_string()).collect();
        Self::new(row_labels, col_labels, observed)
    }

    /// Cross-tabulates bin assignments against category labels.
    ///
    /// Rows follow bin order and carry interval labels; columns are the
    /// distinct categories in sorted order.
    ///
    /// # Errors
    ///
    /// `LengthMismatch` when `categories` and the binned column differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_inference::contingency::{quantile_bin, ContingencyTable};
    ///
    /// let sugar = [10.0, 11.0, 12.0, 13.0];
    /// let grade = ["A", "B", "A", "B"];
    /// let bins = quantile_bin(&sugar, 2).unwrap();
    /// let table = ContingencyTable::cross_tabulate(&bins, &grade).unwrap();
    /// assert_eq!(table.col_labels, vec!["A", "B"]);
    /// assert_eq!(table.grand_total(), 4.0);
    /// ```
    pub fn cross_tabulate<S: AsRef<str>>(
        bins: &QuantileBins,
        categories: &[S],
    ) -> InferenceResult<Self> {
        if bins.assignments.len() != categories.len() {
            return Err(InferenceError::LengthMismatch {
                statistic: "cross tabulation",
                left: bins.assignments.len(),
                right: categories.len(),
            });
        }

        let col_labels: Vec<String> = categories
            .iter()
            .map(|c| c.as_ref())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let n_rows = bins.n_bins();
        if let Some(&row) = bins.assignments.iter().find(|&&row| row >= n_rows) {
            return Err(InferenceError::InvalidParameter {
                parameter: "bin assignment",
                value: row as f64,
                constraint: "below the number of bins",
            });
        }
        let n_cols = col_labels.len();
        let mut observed = vec![0.0; n_rows * n_cols];
        for (&row, cat) in bins.assignments.iter().zip(categories) {
            // col_labels is sorted, so the search always succeeds
            if let Ok(col) = col_labels.binary_search_by(|l| l.as_str().cmp(cat.as_ref())) {
                observed[row * n_cols + col] += 1.0;
            }
        }

        Ok(Self {
            row_labels: bins.labels(),
            col_labels,
            observed,
            n_rows,
            n_cols,
        })
    }

    /// True when the labels and the count vector agree with `n_rows × n_cols`.
    pub fn is_well_formed(&self) -> bool {
        self.row_labels.len() == self.n_rows
            && self.col_labels.len() == self.n_cols
            && self.n_rows.checked_mul(self.n_cols) == Some(self.observed.len())
    }

    /// Count in cell (row, col).
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n_rows || col >= self.n_cols {
            return None;
        }
        self.observed.get(row * self.n_cols + col).copied()
    }

    /// Row sums. Cells missing from a malformed table count as zero.
    pub fn row_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_rows];
        if self.n_cols > 0 {
            for (t, row) in totals.iter_mut().zip(self.observed.chunks(self.n_cols)) {
                *t = row.iter().sum();
            }
        }
        totals
    }

    /// Column sums.
    pub fn col_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_cols];
        for row in self.observed.chunks(self.n_cols.max(1)) {
            for (t, &v) in totals.iter_mut().zip(row) {
                *t += v;
            }
        }
        totals
    }

    /// Total count N.
    pub fn grand_total(&self) -> f64 {
        self.observed.iter().sum()
    }

    /// Expected counts under homogeneity, row-major:
    /// E_ij = row_i · col_j / N.
    ///
    /// Returns zeros for an empty table.
    pub fn expected(&self) -> Vec<f64> {
        let rows = self.row_totals();
        let cols = self.col_totals();
        let total = self.grand_total();
        if total <= 0.0 {
            return vec![0.0; self.observed.len()];
        }
        rows.iter()
            .flat_map(|&r| cols.iter().map(move |&c| r * c / total))
            .collect()
    }

    /// The expected counts as a table with the same labels, for side-by-side
    /// reporting with the observed table.
    pub fn expected_table(&self) -> Self {
        Self {
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            observed: self.expected(),
            n_rows: self.n_rows,
            n_cols: self.n_cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contingency::binning::quantile_bin;

    #[test]
    fn totals() {
        let t = ContingencyTable::from_rows(&[vec![30.0, 10.0], vec![20.0, 40.0]]).unwrap();
        assert_eq!(t.row_totals(), vec![40.0, 60.0]);
        assert_eq!(t.col_totals(), vec![50.0, 50.0]);
        assert_eq!(t.grand_total(), 100.0);
        assert_eq!(t.get(1, 0), Some(20.0));
        assert_eq!(t.get(2, 0), None);
    }

    #[test]
    fn expected_counts() {
        let t = ContingencyTable::from_rows(&[vec![30.0, 10.0], vec![20.0, 40.0]]).unwrap();
        assert_eq!(t.expected(), vec![20.0, 20.0, 30.0, 30.0]);
        let e = t.expected_table();
        assert_eq!(e.row_labels, t.row_labels);
        assert_eq!(e.row_totals(), t.row_totals());
        assert_eq!(e.col_totals(), t.col_totals());
    }

    #[test]
    fn cross_tabulation_sorts_categories() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let grades = ["B", "A", "B", "C", "A", "C"];
        let bins = quantile_bin(&values, 2).unwrap();
        let t = ContingencyTable::cross_tabulate(&bins, &grades).unwrap();
        assert_eq!(t.col_labels, vec!["A", "B", "C"]);
        assert_eq!(t.n_rows, 2);
        // lower bin holds 1, 2, 3
        assert_eq!(t.row_totals(), vec![3.0, 3.0]);
        assert_eq!(t.get(0, 0), Some(1.0));
        assert_eq!(t.get(0, 1), Some(2.0));
        assert_eq!(t.get(1, 2), Some(2.0));
        assert_eq!(t.row_labels, bins.labels());
    }

    #[test]
    fn hand_built_table_with_short_counts() {
        let t = ContingencyTable {
            row_labels: vec!["low".into(), "high".into()],
            col_labels: vec!["A".into(), "B".into()],
            observed: vec![1.0, 2.0, 3.0],
            n_rows: 2,
            n_cols: 2,
        };
        assert!(!t.is_well_formed());
        assert_eq!(t.row_totals(), vec![3.0, 3.0]);
        assert_eq!(t.col_totals(), vec![4.0, 2.0]);
        assert_eq!(t.get(1, 1), None);

        let ok = ContingencyTable::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(ok.is_well_formed());
    }

    #[test]
    fn out_of_range_assignment_is_rejected() {
        let mut bins = quantile_bin(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        bins.assignments[3] = 7;
        assert!(matches!(
            ContingencyTable::cross_tabulate(&bins, &["A", "B", "A", "B"]),
            Err(InferenceError::InvalidParameter {
                parameter: "bin assignment",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ContingencyTable::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(ContingencyTable::from_rows(&[vec![1.0, -2.0], vec![3.0, 4.0]]).is_err());
        assert!(ContingencyTable::from_rows(&[vec![1.0, f64::NAN]]).is_err());

        let bins = quantile_bin(&[1.0, 2.0, 3.0], 2).unwrap();
        assert!(matches!(
            ContingencyTable::cross_tabulate(&bins, &["A", "B"]),
            Err(InferenceError::LengthMismatch { .. })
        ));
    }
}
