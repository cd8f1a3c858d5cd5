//! Least-squares trend of recurrence density against distance from the main
//! diagonal.
//!
//! A recurrence plot of a stationary process has roughly uniform density across
//! its diagonals. A density that fades away from the main diagonal indicates
//! drift, and the slope of that decay is reported as the RQA trend.

use anyhow::anyhow;
use anyhow::Result;
use nalgebra::DMatrix;
use nalgebra::DVector;
use nalgebra::DVectorView;

/// Scale applied to the fitted slope (percent per thousand diagonals).
const TREND_SCALE: f64 = 1000.0;

/// Trend of the series `(x[i], y[i])`: `1000 × slope` of the least-squares line.
///
/// Returns 0 if fewer than two points are available or all `x` are equal.
///
/// # Example
///
/// ```rust
/// use rqa_algos::analysis::trend::density_trend;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [50.0, 40.0, 30.0];
/// assert!((density_trend(&x, &y) + 10_000.0).abs() < 1e-6);
/// assert_eq!(density_trend(&x[..1], &y[..1]), 0.0);
/// ```
pub fn density_trend(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let x_mean = DVectorView::from(x).mean();
    if x.iter().all(|&xi| xi == x_mean) {
        return 0.0;
    }
    match linear_fit(x, y) {
        Ok(((slope, _), _)) => TREND_SCALE * slope,
        Err(e) => {
            tracing::debug!(error = %e, "trend fit failed, reporting 0");
            0.0
        }
    }
}

/// Performs linear regression on the provided data.
///
/// Returns the slope and intercept of the best-fit line together with the
/// coefficient of determination.
///
/// # Errors
///
/// This function returns an error if:
/// - The length of `x` is less than 2.
/// - The lengths of `x` and `y` do not match.
pub(crate) fn linear_fit(x: &[f64], y: &[f64]) -> Result<((f64, f64), f64)> {
    if x.len() < 2 {
        return Err(anyhow!(
            "Data must contain at least two elements for linear fit."
        ));
    }
    if x.len() != y.len() {
        return Err(anyhow!("X and Y data must have the same length."));
    }
    let prob_matrix = DMatrix::from_columns(&[
        DVector::from_column_slice(x),
        DVector::from_element(x.len(), 1.0),
    ]);
    let y = DVectorView::from(y);
    let result = lstsq::lstsq(&prob_matrix, &y.into(), f64::EPSILON).map_err(|e| anyhow!(e))?;

    let y_mean = y.mean();
    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let r_squared = 1.0 - (result.residuals / tss);

    Ok(((result.solution[0], result.solution[1]), r_squared))
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Closed-form ordinary least squares slope.
    fn reference_slope(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len() as f64;
        let sum_x: f64 = x.iter().sum();
        let sum_y: f64 = y.iter().sum();
        let sum_xx: f64 = x.iter().map(|v| v * v).sum();
        let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
        (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x)
    }

    #[test]
    fn test_linear_fit() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let ((slope, intercept), r_sqr) = linear_fit(&x, &y).unwrap();
        assert!(
            (slope - 2.0).abs() < 1e-6,
            "Slope should be approximately 2.0"
        );
        assert!(
            (intercept - 0.0).abs() < 1e-6,
            "Intercept should be approximately 0.0"
        );
        assert!(
            r_sqr > 0.999,
            "R-squared should be close to 1.0 for perfect fit."
        );
    }

    #[test]
    fn test_linear_fit_error() {
        let result = linear_fit(&[1.0], &[2.0]);
        assert!(
            result.is_err(),
            "Linear fit should fail with less than 2 elements."
        );
        let result = linear_fit(&[1.0, 2.0], &[2.0, 3.0, 4.0]);
        assert!(
            result.is_err(),
            "Linear fit should fail with mismatch between x and y data."
        );
    }

    #[test]
    fn trend_matches_closed_form() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let x: Vec<f64> = (3..40).map(f64::from).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|xi| 80.0 - 1.5 * xi + rng.gen_range(-5.0..5.0))
            .collect();
        let expected = 1000.0 * reference_slope(&x, &y);
        let trend = density_trend(&x, &y);
        assert!(
            (trend - expected).abs() < 1e-6 * expected.abs(),
            "trend {trend} should match closed form {expected}"
        );
    }

    #[test]
    fn degenerate_series_has_zero_trend() {
        assert_eq!(density_trend(&[], &[]), 0.0);
        assert_eq!(density_trend(&[2.0], &[10.0]), 0.0);
        assert_eq!(density_trend(&[2.0, 2.0, 2.0], &[1.0, 5.0, 9.0]), 0.0);
    }

    #[test]
    fn flat_density_has_zero_trend() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [25.0; 4];
        assert!(density_trend(&x, &y).abs() < 1e-9);
    }
}
