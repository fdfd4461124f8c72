//! Homogeneity analysis of a continuous measurement across categories.
//!
//! The measurement is cut into equal-population bins, cross-tabulated
//! against the categorical column, and tested with Pearson's chi-square.
//!
//! - [`quantile_bin`] — quantile edges and bin assignment
//! - [`ContingencyTable`] — observed and expected count tables
//! - [`chi_square_homogeneity`] — Pearson's test of homogeneity
//!
//! # Examples
//!
//! ```
//! use u_inference::contingency::homogeneity_test;
//!
//! let sugar: Vec<f64> = (0..60).map(|i| 8.0 + (i % 12) as f64 * 0.5).collect();
//! let grade: Vec<&str> = (0..60).map(|i| if i % 2 == 0 { "A" } else { "B" }).collect();
//! let h = homogeneity_test(&sugar, &grade, 4, 0.05).unwrap();
//! assert_eq!(h.table.n_rows, h.bins.n_bins());
//! assert_eq!(h.result.df, (h.table.n_rows - 1) * (h.table.n_cols - 1));
//! ```

mod binning;
mod chi_square;
mod table;

pub use binning::{quantile_bin, QuantileBins};
pub use chi_square::{chi_square_homogeneity, ChiSquareResult, MIN_EXPECTED_COUNT};
pub use table::ContingencyTable;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{InferenceResult, ValidityWarning};

/// Bins, table and test result of one homogeneity analysis.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HomogeneityAnalysis {
    /// Quantile partition of the measurement.
    pub bins: QuantileBins,
    /// Observed counts, bins × categories.
    pub table: ContingencyTable,
    /// Chi-square test on `table`.
    pub result: ChiSquareResult,
}

impl HomogeneityAnalysis {
    /// Binning and test warnings together.
    pub fn warnings(&self) -> Vec<ValidityWarning> {
        self.bins
            .warnings
            .iter()
            .chain(&self.result.warnings)
            .cloned()
            .collect()
    }
}

/// Bins `values`, cross-tabulates against `categories`, and tests homogeneity.
///
/// # Errors
///
/// Any error of [`quantile_bin`], [`ContingencyTable::cross_tabulate`] or
/// [`chi_square_homogeneity`]. A single category gives `InsufficientData`.
pub fn homogeneity_test<S: AsRef<str>>(
    values: &[f64],
    categories: &[S],
    n_bins: usize,
    alpha: f64,
) -> InferenceResult<HomogeneityAnalysis> {
    let bins = quantile_bin(values, n_bins)?;
    let table = ContingencyTable::cross_tabulate(&bins, categories)?;
    let result = chi_square_homogeneity(&table, alpha)?;
    Ok(HomogeneityAnalysis {
        bins,
        table,
        result,
    })
}
