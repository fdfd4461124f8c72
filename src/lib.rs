//! # u-inference
//!
//! Descriptive and inferential statistics for produce quality records:
//! distribution shape, correlation, simple regression with residual
//! diagnostics, normal-approximation intervals, a lower-tailed proportion
//! test, and chi-square homogeneity over quantile bins.
//!
//! Every engine is a pure function over `f64` slices (or label slices for
//! categorical columns) that returns a self-contained result value. Nothing
//! is cached between calls and no logger is installed; diagnostics go
//! through the `log` facade.
//!
//! ## Modules
//!
//! - [`sample`] — Cleaning helpers, Bessel-corrected mean/variance, category counts
//! - [`moments`] — Biased central moments, skewness, excess kurtosis, shape labels
//! - [`correlation`] — Pearson r with t-test and Fisher interval
//! - [`regression`] — Simple OLS with ANOVA decomposition and coefficient tests
//! - [`interval`] — z intervals for a mean and a difference of means
//! - [`proportion`] — Lower-tailed one-sample proportion z-test
//! - [`contingency`] — Quantile binning, contingency tables, chi-square homogeneity
//! - [`diagnostics`] — Breusch–Pagan, Durbin–Watson, Shapiro–Wilk on residuals
//! - [`toolkit`] — Engines bound to an [`InferenceConfig`]
//!
//! ## Conventions
//!
//! - **Two variances**: [`moments::biased_variance`] divides by n,
//!   [`sample::sample_variance`] by n − 1. Shape statistics use the former,
//!   intervals and regression the latter.
//! - **Errors, not sentinels**: undefined statistics are
//!   [`InferenceError`]s (or `None` for the small-sample adjusted moments),
//!   never `NaN`.
//! - **Warnings travel with results**: [`ValidityWarning`]s such as sparse
//!   expected counts or merged bins are attached to the result they qualify.

pub mod config;
pub mod contingency;
pub mod correlation;
pub mod diagnostics;
pub mod error;
pub mod interval;
pub mod moments;
pub mod proportion;
pub mod regression;
pub mod sample;
pub mod toolkit;

pub use config::InferenceConfig;
pub use error::{InferenceError, InferenceResult, ValidityWarning};
pub use toolkit::Toolkit;
