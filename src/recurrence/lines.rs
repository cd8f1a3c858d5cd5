//! Diagonal line extraction from recurrence matrices.
//!
//! A diagonal line is a maximal run of recurrent cells along one diagonal.
//! Besides the line lengths, the extractor reports the recurrence density of
//! every diagonal and fits its decay away from the main diagonal on both sides
//! (the lower and upper trend).
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use rqa_algos::recurrence::lines::DiagonalLines;
//!
//! let rec = DMatrix::from_element(4, 4, 1u8);
//! let lines = DiagonalLines::extract(&rec, 0).unwrap();
//! assert_eq!(lines.lengths, vec![1, 2, 3, 4, 3, 2, 1]);
//! assert_eq!(lines.considered_points, 16);
//! ```

use rayon::iter::{IntoParallelIterator, ParallelIterator};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::diagonal::Diagonal;
use super::threshold::{check_diag_ignore, square_size};
use super::RecurrenceMatrix;
use crate::analysis::trend::density_trend;
use crate::error::Result;

/// Recurrence statistics of a single diagonal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalProfile {
    pub offset: isize,
    /// Number of cells on the diagonal.
    pub len: usize,
    /// Number of recurrent cells on the diagonal.
    pub recurrent: usize,
    /// Lengths of the lines on this diagonal, in scan order.
    pub lines: Vec<usize>,
}

impl DiagonalProfile {
    /// Scans one diagonal for maximal runs of ones.
    pub fn scan(recurrence: &RecurrenceMatrix, diagonal: Diagonal) -> Self {
        let mut lines = Vec::new();
        let mut recurrent = 0;
        let mut run = 0;
        for cell in diagonal.cells() {
            if recurrence[cell] == 1 {
                run += 1;
                recurrent += 1;
            } else if run > 0 {
                lines.push(run);
                run = 0;
            }
        }
        if run > 0 {
            lines.push(run);
        }
        Self {
            offset: diagonal.offset(),
            len: diagonal.len(),
            recurrent,
            lines,
        }
    }

    /// Fraction of recurrent cells, 0 for an empty diagonal.
    pub fn density(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.recurrent as f64 / self.len as f64
        }
    }
}

/// Diagonal lines and trend statistics of a square recurrence matrix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalLines {
    /// Length of every line, by diagonal offset from `-(n-1)` to `n-1`.
    pub lengths: Vec<usize>,
    /// Longest line the Theiler window allows, `n - diag_ignore`.
    pub max_possible: usize,
    /// Number of matrix entries outside the Theiler window.
    pub considered_points: usize,
    /// Trend of the density below the main diagonal.
    pub trend_lower: f64,
    /// Trend of the density above the main diagonal.
    pub trend_upper: f64,
}

impl DiagonalLines {
    /// Extracts all diagonal lines of `recurrence`.
    ///
    /// Every diagonal is scanned independently (in parallel); a run of length 1
    /// counts as a line. Only cells equal to 1 are recurrent.
    ///
    /// The trend series start `diag_ignore` diagonals away from the main
    /// diagonal and pair the distance from it with `100 × density`.
    ///
    /// # Errors
    ///
    /// - [`RqaError::ShapeError`](crate::error::RqaError::ShapeError) if the matrix is not square.
    /// - [`RqaError::InvalidDiagIgnore`](crate::error::RqaError::InvalidDiagIgnore) if
    ///   `diag_ignore` exceeds the matrix size.
    pub fn extract(recurrence: &RecurrenceMatrix, diag_ignore: usize) -> Result<Self> {
        let n = square_size(recurrence)?;
        check_diag_ignore(diag_ignore, n)?;

        let diagonals: Vec<Diagonal> = Diagonal::all(n).collect();
        let profiles: Vec<DiagonalProfile> = diagonals
            .into_par_iter()
            .map(|diagonal| DiagonalProfile::scan(recurrence, diagonal))
            .collect();

        let lengths: Vec<usize> = profiles
            .iter()
            .flat_map(|profile| profile.lines.iter().copied())
            .collect();
        let (trend_lower, trend_upper) = trends(&profiles, diag_ignore);

        tracing::trace!(
            n,
            lines = lengths.len(),
            trend_lower,
            trend_upper,
            "extracted diagonal lines"
        );

        Ok(Self {
            lengths,
            max_possible: n - diag_ignore,
            considered_points: considered_points(n, diag_ignore),
            trend_lower,
            trend_upper,
        })
    }

    /// Total number of recurrent points covered by lines.
    pub fn recurrent_points(&self) -> usize {
        self.lengths.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

/// Count of `n x n` entries outside the band of `diag_ignore` central diagonals.
pub fn considered_points(n: usize, diag_ignore: usize) -> usize {
    if diag_ignore == 0 {
        n * n
    } else {
        n * n + diag_ignore * (diag_ignore - 1) - n - 2 * n * (diag_ignore - 1)
    }
}

/// Lower and upper density trends around the longest diagonal.
fn trends(profiles: &[DiagonalProfile], diag_ignore: usize) -> (f64, f64) {
    let Some(pivot) = profiles
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.len.cmp(&b.len).then(ib.cmp(ia)))
        .map(|(idx, _)| idx)
    else {
        return (0.0, 0.0);
    };

    let series = |indices: Vec<usize>| -> f64 {
        let (x, y): (Vec<f64>, Vec<f64>) = indices
            .into_iter()
            .map(|idx| {
                let distance = idx.abs_diff(pivot) as f64;
                (distance, 100.0 * profiles[idx].density())
            })
            .unzip();
        density_trend(&x, &y)
    };

    let lower: Vec<usize> = match pivot.checked_sub(diag_ignore) {
        Some(start) => (0..=start).rev().collect(),
        None => Vec::new(),
    };
    let upper: Vec<usize> = (pivot + diag_ignore..profiles.len()).collect();
    (series(lower), series(upper))
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::error::RqaError;
    use crate::recurrence::threshold::{threshold, RescaleMode};

    fn random_recurrence(n: usize, density: f64) -> RecurrenceMatrix {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        DMatrix::from_fn(n, n, |_, _| u8::from(rng.gen_bool(density)))
    }

    #[test]
    fn full_matrix_has_one_line_per_diagonal() {
        let rec = DMatrix::from_element(4, 4, 1u8);
        let lines = DiagonalLines::extract(&rec, 0).unwrap();
        assert_eq!(lines.lengths, vec![1, 2, 3, 4, 3, 2, 1]);
        assert_eq!(lines.max_possible, 4);
        assert_eq!(lines.considered_points, 16);
        assert_eq!(lines.recurrent_points(), 16);
        assert!(lines.trend_lower.abs() < 1e-9, "uniform density has no trend");
        assert!(lines.trend_upper.abs() < 1e-9, "uniform density has no trend");
    }

    #[test]
    fn runs_are_split_by_zeros() {
        #[rustfmt::skip]
        let rec = DMatrix::from_row_slice(4, 4, &[
            1u8, 0, 0, 0,
            0, 1, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 1,
        ]);
        let lines = DiagonalLines::extract(&rec, 0).unwrap();
        assert_eq!(lines.lengths, vec![2, 1]);
    }

    #[test]
    fn lines_ordered_by_offset() {
        #[rustfmt::skip]
        let rec = DMatrix::from_row_slice(3, 3, &[
            0u8, 1, 1,
            0, 0, 1,
            1, 0, 0,
        ]);
        let lines = DiagonalLines::extract(&rec, 0).unwrap();
        // offset -2 holds (2, 0), offset 1 holds (0, 1) and (1, 2), offset 2 holds (0, 2)
        assert_eq!(lines.lengths, vec![1, 2, 1]);
    }

    #[test]
    fn empty_matrix_has_no_lines() {
        let rec = DMatrix::<u8>::zeros(5, 5);
        let lines = DiagonalLines::extract(&rec, 1).unwrap();
        assert!(lines.is_empty());
        assert_eq!(lines.max_possible, 4);
    }

    #[test]
    fn considered_points_matches_brute_force() {
        for n in 1..12usize {
            for diag_ignore in 0..=n {
                let brute = (0..n)
                    .flat_map(|i| (0..n).map(move |j| (i, j)))
                    .filter(|&(i, j)| i.abs_diff(j) >= diag_ignore)
                    .count();
                assert_eq!(
                    considered_points(n, diag_ignore),
                    brute,
                    "n={n}, diag_ignore={diag_ignore}"
                );
            }
        }
    }

    #[test]
    fn line_sum_equals_recurrent_points_outside_band() {
        let dist = DMatrix::from_fn(30, 30, |i, j| ((i * 7 + j * 3) % 11) as f64);
        for diag_ignore in [0, 1, 2, 5] {
            let rec = threshold(&dist, RescaleMode::None, 4.0, diag_ignore).unwrap();
            let lines = DiagonalLines::extract(&rec, diag_ignore).unwrap();
            let ones = rec.iter().filter(|&&v| v == 1).count();
            assert_eq!(lines.recurrent_points(), ones);
            assert!(lines.lengths.iter().all(|&l| l >= 1 && l <= lines.max_possible));
        }
    }

    #[test]
    fn trend_detects_fading_density() {
        // Recurrent only close to the main diagonal: density falls with distance.
        let n = 20;
        let rec = DMatrix::from_fn(n, n, |i: usize, j: usize| u8::from(i.abs_diff(j) < 5));
        let lines = DiagonalLines::extract(&rec, 1).unwrap();
        assert!(lines.trend_lower < 0.0, "lower trend should be negative");
        assert!(lines.trend_upper < 0.0, "upper trend should be negative");
        assert!((lines.trend_lower - lines.trend_upper).abs() < 1e-6);
    }

    #[test]
    fn trend_matches_reference_fit() {
        let n = 25;
        let diag_ignore = 2;
        let rec = random_recurrence(n, 0.3);
        let lines = DiagonalLines::extract(&rec, diag_ignore).unwrap();

        let density = |offset: isize| {
            let diagonal = Diagonal::new(n, offset);
            let ones = diagonal.cells().filter(|&c| rec[c] == 1).count();
            100.0 * ones as f64 / diagonal.len() as f64
        };
        let reference = |sign: isize| {
            let points: Vec<(f64, f64)> = (diag_ignore..n)
                .map(|k| (k as f64, density(sign * k as isize)))
                .collect();
            let m = points.len() as f64;
            let sx: f64 = points.iter().map(|p| p.0).sum();
            let sy: f64 = points.iter().map(|p| p.1).sum();
            let sxx: f64 = points.iter().map(|p| p.0 * p.0).sum();
            let sxy: f64 = points.iter().map(|p| p.0 * p.1).sum();
            1000.0 * (m * sxy - sx * sy) / (m * sxx - sx * sx)
        };
        assert!((lines.trend_lower - reference(-1)).abs() < 1e-6);
        assert!((lines.trend_upper - reference(1)).abs() < 1e-6);
    }

    #[test]
    fn trend_needs_two_diagonals() {
        let rec = DMatrix::from_element(3, 3, 1u8);
        // Only the outermost diagonal remains on each side.
        let lines = DiagonalLines::extract(&rec, 2).unwrap();
        assert_eq!(lines.trend_lower, 0.0);
        assert_eq!(lines.trend_upper, 0.0);
        let lines = DiagonalLines::extract(&rec, 3).unwrap();
        assert_eq!(lines.max_possible, 0);
        assert_eq!(lines.considered_points, 0);
    }

    #[test]
    fn non_square_fails() {
        let rec = DMatrix::<u8>::zeros(3, 4);
        assert!(matches!(
            DiagonalLines::extract(&rec, 0),
            Err(RqaError::ShapeError { .. })
        ));
    }

    #[test]
    fn window_wider_than_matrix() {
        let rec = DMatrix::<u8>::zeros(3, 3);
        assert!(matches!(
            DiagonalLines::extract(&rec, 4),
            Err(RqaError::InvalidDiagIgnore { .. })
        ));
    }
}
