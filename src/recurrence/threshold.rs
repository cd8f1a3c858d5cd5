//! Thresholding of distance matrices into binary recurrence matrices.
//!
//! A distance matrix is optionally rescaled, compared against a radius and a
//! band of diagonals around the main diagonal (the Theiler window) is cleared.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use rqa_algos::recurrence::threshold::{threshold, RescaleMode};
//!
//! let dist = DMatrix::from_row_slice(3, 3, &[0.0, 0.5, 2.0, 0.5, 0.0, 1.0, 2.0, 1.0, 0.0]);
//! let rec = threshold(&dist, RescaleMode::None, 1.0, 1).unwrap();
//! assert_eq!(rec[(0, 1)], 1);
//! assert_eq!(rec[(0, 2)], 0);
//! assert_eq!(rec[(1, 1)], 0); // main diagonal excluded
//! ```

use nalgebra::DMatrix;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::diagonal::Diagonal;
use super::RecurrenceMatrix;
use crate::error::{Result, RqaError};

/// Normalisation applied to distances before thresholding.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum RescaleMode {
    /// Raw distances.
    #[default]
    None,
    /// Distances divided by the mean of all entries.
    Mean,
    /// Distances divided by the largest entry.
    Max,
}

impl RescaleMode {
    /// Factor every distance is divided by.
    fn divisor(&self, dist: &DMatrix<f64>) -> f64 {
        match self {
            RescaleMode::None => 1.0,
            RescaleMode::Mean => dist.mean(),
            RescaleMode::Max => dist.max(),
        }
    }
}

/// Checks that `matrix` is square and returns its size.
pub(crate) fn square_size<T>(matrix: &DMatrix<T>) -> Result<usize> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(RqaError::ShapeError {
            expected: "square matrix".into(),
            got: format!("{rows}x{cols}"),
        });
    }
    Ok(rows)
}

/// Checks that the Theiler window fits inside an `n x n` matrix.
pub(crate) fn check_diag_ignore(diag_ignore: usize, n: usize) -> Result<()> {
    if diag_ignore > n {
        return Err(RqaError::InvalidDiagIgnore {
            diag_ignore,
            size: n,
        });
    }
    Ok(())
}

/// Thresholds a square distance matrix.
///
/// Entry `(i, j)` is 1 iff the rescaled distance is `<= radius`. Afterwards
/// the diagonals at offsets `-(diag_ignore - 1)..=(diag_ignore - 1)` are set
/// to 0: `diag_ignore = 1` clears the main diagonal only, `diag_ignore = 0`
/// clears nothing and is the setting for cross recurrence.
///
/// # Errors
///
/// - [`RqaError::ShapeError`] if `dist` is not square.
/// - [`RqaError::DegenerateInput`] if `dist` has at most one entry.
/// - [`RqaError::InvalidRadius`] if `radius` is not strictly positive.
/// - [`RqaError::InvalidDiagIgnore`] if `diag_ignore` exceeds the matrix size.
pub fn threshold(
    dist: &DMatrix<f64>,
    rescale: RescaleMode,
    radius: f64,
    diag_ignore: usize,
) -> Result<RecurrenceMatrix> {
    let n = square_size(dist)?;
    if n <= 1 {
        return Err(RqaError::DegenerateInput { size: n });
    }
    if radius.is_nan() || radius <= 0.0 {
        return Err(RqaError::InvalidRadius(radius));
    }
    check_diag_ignore(diag_ignore, n)?;

    let divisor = rescale.divisor(dist);
    tracing::trace!(n, ?rescale, divisor, radius, diag_ignore, "thresholding");
    let mut recurrence = dist.map(|d| u8::from(d / divisor <= radius));

    for distance in 0..diag_ignore as isize {
        for offset in [distance, -distance] {
            for cell in Diagonal::new(n, offset).cells() {
                recurrence[cell] = 0;
            }
        }
    }
    Ok(recurrence)
}
