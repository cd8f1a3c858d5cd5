//! Recurrence Quantification Analysis (RQA) of a distance matrix.
//!
//! The analysis chains the pipeline stages:
//!
//! 1. **Thresholding**: distances are rescaled and compared with the radius,
//!    the Theiler window is cleared.
//! 2. **Line extraction**: every diagonal is scanned for lines, density trends
//!    are fitted.
//! 3. **Histogram**: lines of at least `min_line` are binned by length.
//! 4. **Entropy**: Shannon entropy of the histogram, if it has more than one bin.
//! 5. **Aggregation**: percent recurrence, percent determinism, longest line.
//!
//! A failing stage aborts the analysis with an [`RqaError::Stage`] naming it.
//!
//! # Example
//!
//! ```rust
//! use rqa_algos::analysis::rqa::{EmbeddingParams, RqaAnalysis, RqaConfig};
//! use rqa_algos::recurrence::threshold::RescaleMode;
//!
//! let series: Vec<f64> = (0..200).map(|i| (i as f64 * 0.3).sin()).collect();
//! let config = RqaConfig::default()
//!     .rescale(RescaleMode::Mean)
//!     .radius(0.3)
//!     .min_line(2);
//! let analysis = RqaAnalysis::auto(&series, EmbeddingParams::new(2, 5), &config).unwrap();
//! println!("%REC: {}", analysis.stats.percent_recurrence);
//! println!("%DET: {}", analysis.stats.percent_determinism);
//! assert!(analysis.stats.percent_recurrence > 0.0);
//! ```
//!
//! # References
//!
//! - Webber, C. L., Zbilut, J. P. (2005). *Recurrence quantification analysis of
//!   nonlinear dynamical systems*. Tutorials in contemporary nonlinear methods
//!   for the behavioral sciences, 26-94.
//! - Marwan, N., Romano, M. C., Thiel, M., Kurths, J. (2007). *Recurrence plots
//!   for the analysis of complex systems*. Physics Reports, 438(5-6), 237-329.

use nalgebra::DMatrix;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::entropy::EntropyAnalysis;
use super::histogram::LineHistogram;
use crate::embedding::distance::{compute_distance, distance_between, DistanceStrategy};
use crate::embedding::points::EmbeddedPoints;
use crate::error::{Result, RqaError, Stage};
use crate::recurrence::lines::DiagonalLines;
use crate::recurrence::threshold::{threshold, RescaleMode};
use crate::recurrence::RecurrenceMatrix;

/// Auto recurrence of one series or cross recurrence of two.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum RecurrenceMode {
    /// A series compared with itself; the Theiler window applies.
    #[default]
    Auto,
    /// Two different series; no diagonals are excluded.
    Cross,
}

/// Time-delay embedding parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct EmbeddingParams {
    /// Embedding dimension, at least 1.
    pub dim: usize,
    /// Time delay in samples, at least 1.
    pub lag: usize,
}

impl EmbeddingParams {
    pub fn new(dim: usize, lag: usize) -> Self {
        Self { dim, lag }
    }
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        Self { dim: 3, lag: 15 }
    }
}

/// Parameters of one RQA run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RqaConfig {
    pub rescale: RescaleMode,
    /// Recurrence threshold applied to the rescaled distances.
    pub radius: f64,
    /// Width of the Theiler window; 1 excludes the main diagonal only.
    pub diag_ignore: usize,
    /// Shortest diagonal line counted as deterministic.
    pub min_line: usize,
    pub mode: RecurrenceMode,
}

impl Default for RqaConfig {
    fn default() -> Self {
        Self {
            rescale: RescaleMode::None,
            radius: 0.2,
            diag_ignore: 1,
            min_line: 2,
            mode: RecurrenceMode::Auto,
        }
    }
}

impl RqaConfig {
    pub fn rescale(mut self, rescale: RescaleMode) -> Self {
        self.rescale = rescale;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn diag_ignore(mut self, diag_ignore: usize) -> Self {
        self.diag_ignore = diag_ignore;
        self
    }

    pub fn min_line(mut self, min_line: usize) -> Self {
        self.min_line = min_line;
        self
    }

    pub fn mode(mut self, mode: RecurrenceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Theiler window actually applied: always 0 in cross mode.
    pub fn effective_diag_ignore(&self) -> usize {
        match self.mode {
            RecurrenceMode::Auto => self.diag_ignore,
            RecurrenceMode::Cross => 0,
        }
    }
}

/// Scalar RQA measures.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RqaStats {
    /// Configuration used, with the Theiler window actually applied.
    pub config: RqaConfig,
    /// Percentage of considered points that are recurrent (%REC).
    pub percent_recurrence: f64,
    /// Percentage of recurrent points on lines of at least `min_line` (%DET).
    pub percent_determinism: f64,
    /// Entropy of the line length histogram.
    pub entropy: EntropyAnalysis,
    /// Density trend below the main diagonal.
    pub trend_lower: f64,
    /// Density trend above the main diagonal.
    pub trend_upper: f64,
    /// Longest line found among lines of at least `min_line`.
    pub max_line_found: usize,
    /// Longest line the Theiler window allows.
    pub max_line_possible: usize,
    /// Number of matrix entries outside the Theiler window.
    pub considered_points: usize,
    /// Mean length of lines of at least `min_line`.
    pub line_mean: f64,
    /// Population standard deviation of those lengths.
    pub line_std_dev: f64,
    /// Number of lines of at least `min_line`.
    pub line_count: usize,
}

/// Full result of an RQA run: the recurrence matrix, intermediate results
/// and the scalar measures.
#[derive(Debug, Clone)]
pub struct RqaAnalysis {
    pub recurrence: RecurrenceMatrix,
    pub lines: DiagonalLines,
    pub histogram: LineHistogram,
    pub stats: RqaStats,
}

impl RqaAnalysis {
    /// Runs RQA on a precomputed square distance matrix.
    ///
    /// # Errors
    ///
    /// Every error is wrapped in [`RqaError::Stage`]:
    ///
    /// - Thresholding: [`RqaError::ShapeError`], [`RqaError::DegenerateInput`],
    ///   [`RqaError::InvalidRadius`], [`RqaError::InvalidDiagIgnore`].
    /// - Line extraction: [`RqaError::NoRecurrence`] if the matrix has no line.
    /// - Histogram: [`RqaError::InvalidMinLength`].
    /// - Entropy: [`RqaError::InvalidStateCount`], [`RqaError::DegenerateDistribution`].
    pub fn analyze(distances: &DMatrix<f64>, config: &RqaConfig) -> Result<Self> {
        let diag_ignore = config.effective_diag_ignore();
        if diag_ignore != config.diag_ignore {
            tracing::warn!(
                requested = config.diag_ignore,
                "cross recurrence ignores no diagonals, overriding diag_ignore"
            );
        }
        let config = RqaConfig {
            diag_ignore,
            ..*config
        };

        let recurrence = threshold(distances, config.rescale, config.radius, diag_ignore)
            .map_err(|e| e.in_stage(Stage::Thresholding))?;
        tracing::debug!(
            size = recurrence.nrows(),
            ?config.rescale,
            config.radius,
            diag_ignore,
            "thresholded distance matrix"
        );

        let lines = DiagonalLines::extract(&recurrence, diag_ignore)
            .map_err(|e| e.in_stage(Stage::LineExtraction))?;
        if lines.is_empty() {
            return Err(RqaError::NoRecurrence.in_stage(Stage::LineExtraction));
        }
        tracing::debug!(
            lines = lines.lengths.len(),
            max_possible = lines.max_possible,
            considered_points = lines.considered_points,
            "extracted diagonal lines"
        );

        let histogram = LineHistogram::from_lengths(&lines.lengths, config.min_line)
            .map_err(|e| e.in_stage(Stage::Histogram))?;

        let entropy = if histogram.bins.len() > 1 {
            let nstates = (lines.max_possible + 1).saturating_sub(config.min_line);
            EntropyAnalysis::shannon(&histogram.frequencies(), nstates)
                .map_err(|e| e.in_stage(Stage::Entropy))?
        } else {
            EntropyAnalysis::default()
        };

        let recurrent_points = lines.recurrent_points();
        let percent_recurrence = 100.0 * recurrent_points as f64 / lines.considered_points as f64;
        let percent_determinism = if histogram.is_empty() {
            0.0
        } else {
            100.0 * histogram.determined_points() as f64 / recurrent_points as f64
        };

        let stats = RqaStats {
            config,
            percent_recurrence,
            percent_determinism,
            entropy,
            trend_lower: lines.trend_lower,
            trend_upper: lines.trend_upper,
            max_line_found: histogram.max_length(),
            max_line_possible: lines.max_possible,
            considered_points: lines.considered_points,
            line_mean: histogram.mean,
            line_std_dev: histogram.std_dev,
            line_count: histogram.count,
        };
        tracing::debug!(
            percent_recurrence,
            percent_determinism,
            entropy = stats.entropy.entropy,
            max_line_found = stats.max_line_found,
            "rqa complete"
        );

        Ok(Self {
            recurrence,
            lines,
            histogram,
            stats,
        })
    }

    /// Auto recurrence analysis of a time-delay embedded series.
    ///
    /// The configured mode is ignored; the analysis always runs in
    /// [`RecurrenceMode::Auto`].
    pub fn auto(series: &[f64], embedding: EmbeddingParams, config: &RqaConfig) -> Result<Self> {
        let distances = compute_distance(series, series, embedding.dim, embedding.lag)?;
        Self::analyze(&distances.matrix, &config.mode(RecurrenceMode::Auto))
    }

    /// Cross recurrence analysis of two equally long series.
    ///
    /// Always runs in [`RecurrenceMode::Cross`], so no diagonals are excluded.
    pub fn cross(
        series_a: &[f64],
        series_b: &[f64],
        embedding: EmbeddingParams,
        config: &RqaConfig,
    ) -> Result<Self> {
        let distances = compute_distance(series_a, series_b, embedding.dim, embedding.lag)?;
        Self::analyze(&distances.matrix, &config.mode(RecurrenceMode::Cross))
    }

    /// Auto recurrence analysis of a multivariate series (`time x variables`)
    /// whose rows are used as phase-space points without further embedding.
    pub fn multivariate(data: &DMatrix<f64>, config: &RqaConfig) -> Result<Self> {
        let points = EmbeddedPoints::from_rows(data)?;
        let distances = distance_between(&points, &points, &DistanceStrategy::Euclidean)?;
        Self::analyze(&distances, &config.mode(RecurrenceMode::Auto))
    }
}
