//! Recurrence Quantification Analysis (RQA)
//!
//! This crate embeds time series in a reconstructed phase space, thresholds the
//! pairwise distances of the embedded points into a recurrence matrix and
//! quantifies the diagonal structure of that matrix: recurrence rate,
//! determinism, line length distribution, entropy and trend.
//!
//! Start with [`analysis::rqa::RqaAnalysis`]; the individual stages are
//! available in [`embedding`], [`recurrence`] and [`analysis`].

pub mod analysis;
pub mod embedding;
pub mod error;
pub mod recurrence;

pub use error::{Result, RqaError, Stage};
