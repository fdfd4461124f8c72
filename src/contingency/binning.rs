//! Quantile (equal-population) binning of a continuous column.

#[cfg(feature = "serde")]
use serde::Serialize;
use u_numflow::stats;

use crate::error::{ensure_finite, ensure_len, InferenceError, InferenceResult, ValidityWarning};

/// Equal-population partition of a numeric column.
///
/// Bin `j` is the right-closed interval (edges[j], edges[j+1]]; the first bin
/// also holds the minimum.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QuantileBins {
    /// Distinct bin edges, ascending. `edges.len() == n_bins() + 1`.
    pub edges: Vec<f64>,
    /// Bin index of each input observation, in input order.
    pub assignments: Vec<usize>,
    /// Observations per bin.
    pub counts: Vec<usize>,
    /// Number of bins asked for.
    pub requested: usize,
    /// `BinCollapse` when tied edges were merged.
    pub warnings: Vec<ValidityWarning>,
}

impl QuantileBins {
    /// Effective number of bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// True when ties reduced the bin count below the request.
    pub fn collapsed(&self) -> bool {
        self.n_bins() < self.requested
    }

    /// Interval bounds (lower, upper] of bin `index`.
    pub fn bounds(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.edges.get(index)?, *self.edges.get(index + 1)?))
    }

    /// Interval labels such as `(52.310, 58.004]`.
    pub fn labels(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .map(|w| format!("({:.3}, {:.3}]", w[0], w[1]))
            .collect()
    }
}

/// Partitions `values` into `n_bins` groups of roughly equal population.
///
/// # Algorithm
///
/// 1. Edges at the empirical quantiles i/q, i = 0..=q (linear interpolation
///    between order statistics).
/// 2. Coincident edges are merged. Heavy ties can therefore yield fewer bins
///    than requested, which is reported as [`ValidityWarning::BinCollapse`].
/// 3. Each observation goes to the right-closed interval containing it.
///
/// # Errors
///
/// - `InvalidParameter` if `n_bins` is 0
/// - `InsufficientData` for an empty column, `NonFinite` for missing entries
/// - `DegenerateInput` if every value is identical (no interval remains)
///
/// # Examples
///
/// ```
/// use u_inference::contingency::quantile_bin;
///
/// let values: Vec<f64> = (1..=12).map(f64::from).collect();
/// let bins = quantile_bin(&values, 6).unwrap();
/// assert_eq!(bins.n_bins(), 6);
/// assert!(bins.counts.iter().all(|&c| c == 2));
/// ```
pub fn quantile_bin(values: &[f64], n_bins: usize) -> InferenceResult<QuantileBins> {
    if n_bins == 0 {
        return Err(InferenceError::InvalidParameter {
            parameter: "n_bins",
            value: 0.0,
            constraint: "at least 1 bin",
        });
    }
    ensure_len(values, 1, "quantile binning")?;
    ensure_finite(values, "values")?;

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mut edges = Vec::with_capacity(n_bins + 1);
    for i in 0..=n_bins {
        let p = i as f64 / n_bins as f64;
        let q = stats::quantile_sorted(&sorted, p)
            .ok_or(InferenceError::NonFinite { quantity: "values" })?;
        // interpolation may undershoot the previous edge by an ulp
        let floor = edges.last().copied().unwrap_or(f64::NEG_INFINITY);
        edges.push(q.max(floor));
    }
    edges.dedup();

    if edges.len() < 2 {
        return Err(InferenceError::DegenerateInput {
            statistic: "quantile binning",
            quantity: "values",
        });
    }

    let effective = edges.len() - 1;
    let upper_edges = &edges[1..];
    let assignments: Vec<usize> = values
        .iter()
        .map(|&x| upper_edges.partition_point(|&e| e < x).min(effective - 1))
        .collect();

    let mut counts = vec![0_usize; effective];
    for &bin in &assignments {
        counts[bin] += 1;
    }

    let mut warnings = Vec::new();
    if effective < n_bins {
        let w = ValidityWarning::BinCollapse {
            requested: n_bins,
            effective,
        };
        log::warn!("{w}");
        warnings.push(w);
    }

    Ok(QuantileBins {
        edges,
        assignments,
        counts,
        requested: n_bins,
        warnings,
    })
}
