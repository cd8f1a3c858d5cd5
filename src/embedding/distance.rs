//! Pairwise distances between embedded points.
//!
//! The distance matrix is the dominant cost of an RQA run (`O(n² · dim)`), so
//! rows are computed in parallel. The result does not depend on scheduling.
//!
//! # Example
//!
//! ```rust
//! use rqa_algos::embedding::distance::compute_distance;
//!
//! let series = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let distances = compute_distance(&series, &series, 2, 1).unwrap();
//! assert_eq!(distances.matrix.shape(), (4, 4));
//! assert_eq!(distances.matrix[(0, 0)], 0.0);
//! ```

use anyhow::Result as MetricResult;
use nalgebra::DMatrix;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::points::{embedded_len, EmbeddedPoints};
use crate::error::{Result, RqaError};

/// A distance function between two phase-space points of equal dimension.
///
/// # Example
///
/// ```
/// use rqa_algos::embedding::distance::DistanceMetric;
/// use anyhow::Result;
///
/// struct Chebyshev;
///
/// impl DistanceMetric for Chebyshev {
///     fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
///         Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max))
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait DistanceMetric {
    /// Distance between points `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> MetricResult<f64>;
}

/// Available distance metrics.
/// User provided metrics can be passed via the `Custom` variant.
#[derive(Default)]
pub enum DistanceStrategy {
    /// Euclidean norm of the coordinate difference.
    #[default]
    Euclidean,
    /// A custom metric. Must be `Sync + Send` since rows are evaluated in parallel.
    Custom(Box<dyn DistanceMetric + Sync + Send>),
}

impl DistanceMetric for DistanceStrategy {
    fn distance(&self, a: &[f64], b: &[f64]) -> MetricResult<f64> {
        match self {
            DistanceStrategy::Euclidean => EuclideanDistance.distance(a, b),
            DistanceStrategy::Custom(metric) => metric.distance(a, b),
        }
    }
}

/// Euclidean distance.
pub struct EuclideanDistance;

impl DistanceMetric for EuclideanDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> MetricResult<f64> {
        if a.len() != b.len() {
            return Err(anyhow::anyhow!(
                "points must have the same dimension ({} vs {})",
                a.len(),
                b.len()
            ));
        }
        Ok(a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt())
    }
}

/// Distance matrix together with the embedding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedDistances {
    pub dim: usize,
    pub lag: usize,
    /// `n2 x n2`; entry `(i, j)` is the distance from point `i` of the first
    /// series to point `j` of the second.
    pub matrix: DMatrix<f64>,
}

/// Embeds `seq_a` and `seq_b` with `(dim, lag)` and computes their Euclidean
/// distance matrix.
///
/// For `dim == 1` the absolute difference of raw samples is used directly.
///
/// # Errors
///
/// - [`RqaError::InvalidEmbedding`] if either sequence is empty or the
///   parameters leave no embedded point.
/// - [`RqaError::ShapeError`] if the sequences differ in length.
pub fn compute_distance(
    seq_a: &[f64],
    seq_b: &[f64],
    dim: usize,
    lag: usize,
) -> Result<EmbeddedDistances> {
    compute_distance_with(seq_a, seq_b, dim, lag, &DistanceStrategy::Euclidean)
}

/// Same as [`compute_distance`] with an explicit distance metric.
pub fn compute_distance_with(
    seq_a: &[f64],
    seq_b: &[f64],
    dim: usize,
    lag: usize,
    metric: &DistanceStrategy,
) -> Result<EmbeddedDistances> {
    let n2 = embedded_len(seq_a.len(), dim, lag)?;
    embedded_len(seq_b.len(), dim, lag)?;
    if seq_a.len() != seq_b.len() {
        return Err(RqaError::ShapeError {
            expected: format!("second sequence of length {}", seq_a.len()),
            got: format!("length {}", seq_b.len()),
        });
    }
    tracing::trace!(n = seq_a.len(), n2, dim, lag, "computing distance matrix");

    let matrix = match (dim, metric) {
        (1, DistanceStrategy::Euclidean) => absolute_differences(&seq_a[..n2], &seq_b[..n2]),
        _ => {
            let points_a = EmbeddedPoints::delay(seq_a, dim, lag)?;
            let points_b = EmbeddedPoints::delay(seq_b, dim, lag)?;
            distance_between(&points_a, &points_b, metric)?
        }
    };
    Ok(EmbeddedDistances { dim, lag, matrix })
}

/// Distance matrix between two point sets of equal size and dimension.
///
/// # Errors
///
/// - [`RqaError::ShapeError`] if the sets differ in point count or dimension.
/// - [`RqaError::Metric`] if the metric fails for any pair.
pub fn distance_between(
    points_a: &EmbeddedPoints,
    points_b: &EmbeddedPoints,
    metric: &DistanceStrategy,
) -> Result<DMatrix<f64>> {
    if points_a.len() != points_b.len() || points_a.dim() != points_b.dim() {
        return Err(RqaError::ShapeError {
            expected: format!("{} points of dimension {}", points_a.len(), points_a.dim()),
            got: format!("{} points of dimension {}", points_b.len(), points_b.dim()),
        });
    }
    let n = points_a.len();
    let rows = (0..n)
        .into_par_iter()
        .map(|i| {
            let a = points_a.point(i);
            points_b
                .points()
                .map(|b| metric.distance(a, b))
                .collect::<MetricResult<Vec<f64>>>()
        })
        .collect::<MetricResult<Vec<Vec<f64>>>>()?;
    Ok(DMatrix::from_row_iterator(n, n, rows.into_iter().flatten()))
}

fn absolute_differences(a: &[f64], b: &[f64]) -> DMatrix<f64> {
    let n = a.len();
    let rows: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| b.iter().map(move |&bj| (a[i] - bj).abs()))
        .collect();
    DMatrix::from_row_slice(n, n, &rows)
}
