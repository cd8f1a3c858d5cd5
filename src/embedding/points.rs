//! Phase-space reconstruction of time series.
//!
//! Two ways to obtain an [`EmbeddedPoints`] set are provided:
//!
//! - [`EmbeddedPoints::delay`]: time-delay (Takens) embedding of a scalar series.
//! - [`EmbeddedPoints::from_rows`]: a multivariate series whose rows already are
//!   phase-space points.
//!
//! # Example
//!
//! ```rust
//! use rqa_algos::embedding::points::EmbeddedPoints;
//!
//! let series = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let points = EmbeddedPoints::delay(&series, 2, 2).unwrap();
//! assert_eq!(points.len(), 3);
//! assert_eq!(points.point(1), &[2.0, 4.0]);
//! ```

use nalgebra::DMatrix;

use crate::error::{Result, RqaError};

/// Number of embedded points `n - lag * (dim - 1)` for a series of length `n`.
///
/// # Errors
///
/// Returns [`RqaError::InvalidEmbedding`] if the series is empty, `dim` or `lag`
/// is zero, or the parameters leave no usable point.
pub fn embedded_len(n: usize, dim: usize, lag: usize) -> Result<usize> {
    if n == 0 {
        return Err(RqaError::InvalidEmbedding {
            reason: "input sequence is empty".into(),
        });
    }
    if dim < 1 {
        return Err(RqaError::InvalidEmbedding {
            reason: "embedding dimension must be at least 1".into(),
        });
    }
    if lag < 1 {
        return Err(RqaError::InvalidEmbedding {
            reason: "time delay must be at least 1".into(),
        });
    }
    let span = lag
        .checked_mul(dim - 1)
        .filter(|&span| span < n)
        .ok_or_else(|| RqaError::InvalidEmbedding {
            reason: format!("not enough data ({n} samples) for dim={dim}, lag={lag}"),
        })?;
    Ok(n - span)
}

/// A set of points in reconstructed phase space.
///
/// Coordinates are stored as a `dim x len` matrix, one column per point, so
/// each point is a contiguous slice of the column-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedPoints {
    coords: DMatrix<f64>,
}

impl EmbeddedPoints {
    /// Time-delay embedding of `series`.
    ///
    /// Point `i` is `[x[i], x[i + lag], ..., x[i + lag * (dim - 1)]]`.
    pub fn delay(series: &[f64], dim: usize, lag: usize) -> Result<Self> {
        let n2 = embedded_len(series.len(), dim, lag)?;
        let coords = DMatrix::from_fn(dim, n2, |k, i| series[lag * k + i]);
        Ok(Self { coords })
    }

    /// Uses each row of a `time x variables` matrix as one point.
    pub fn from_rows(data: &DMatrix<f64>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(RqaError::InvalidEmbedding {
                reason: format!(
                    "multivariate series of shape {}x{} has no points",
                    data.nrows(),
                    data.ncols()
                ),
            });
        }
        Ok(Self {
            coords: data.transpose(),
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.coords.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of coordinates per point.
    pub fn dim(&self) -> usize {
        self.coords.nrows()
    }

    /// Coordinates of point `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn point(&self, i: usize) -> &[f64] {
        let dim = self.dim();
        &self.coords.as_slice()[i * dim..(i + 1) * dim]
    }

    /// Iterator over all points in time order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.coords.as_slice().chunks_exact(self.dim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_len_counts_points() {
        assert_eq!(embedded_len(5, 2, 1).unwrap(), 4);
        assert_eq!(embedded_len(10, 3, 2).unwrap(), 6);
        assert_eq!(embedded_len(7, 1, 4).unwrap(), 7);
    }

    #[test]
    fn embedded_len_rejects_infeasible() {
        assert!(matches!(
            embedded_len(4, 3, 2),
            Err(RqaError::InvalidEmbedding { .. })
        ));
        assert!(embedded_len(0, 1, 1).is_err(), "empty series must fail");
        assert!(embedded_len(10, 0, 1).is_err(), "dim 0 must fail");
        assert!(embedded_len(10, 2, 0).is_err(), "lag 0 must fail");
        assert!(
            embedded_len(10, 2, usize::MAX).is_err(),
            "overflowing span must fail"
        );
    }

    #[test]
    fn delay_embedding_strides_by_lag() {
        let series = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let points = EmbeddedPoints::delay(&series, 3, 2).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points.dim(), 3);
        assert_eq!(points.point(0), &[0.0, 2.0, 4.0]);
        assert_eq!(points.point(2), &[2.0, 4.0, 6.0]);
        assert_eq!(points.points().count(), 3);
    }

    #[test]
    fn rows_become_points() {
        let data = DMatrix::from_row_slice(3, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        let points = EmbeddedPoints::from_rows(&data).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points.dim(), 2);
        assert_eq!(points.point(1), &[2.0, 20.0]);
    }

    #[test]
    fn empty_multivariate_fails() {
        let data = DMatrix::<f64>::zeros(0, 3);
        assert!(EmbeddedPoints::from_rows(&data).is_err());
    }
}
