//! Histogram and descriptive statistics of diagonal line lengths.

use std::collections::BTreeMap;

use nalgebra::DVector;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RqaError};

/// Number of lines of one particular length.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramBin {
    pub length: usize,
    pub count: usize,
}

/// Frequency table of line lengths `>= min_line` with their mean, population
/// standard deviation and count.
///
/// If no line reaches `min_line` the histogram is empty and all statistics are
/// zero; this is a valid outcome, not an error.
///
/// # Example
///
/// ```rust
/// use rqa_algos::analysis::histogram::LineHistogram;
///
/// let hist = LineHistogram::from_lengths(&[1, 2, 2, 4], 2).unwrap();
/// assert_eq!(hist.count, 3);
/// assert_eq!(hist.frequencies(), vec![2.0, 1.0]);
/// assert_eq!(hist.max_length(), 4);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineHistogram {
    /// Bins ordered by increasing length.
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl LineHistogram {
    /// Builds the histogram of `lengths` restricted to lengths `>= min_line`.
    ///
    /// # Errors
    ///
    /// Returns [`RqaError::InvalidMinLength`] if `min_line` is 0.
    pub fn from_lengths(lengths: &[usize], min_line: usize) -> Result<Self> {
        if min_line < 1 {
            return Err(RqaError::InvalidMinLength(min_line));
        }
        let valid: Vec<f64> = lengths
            .iter()
            .filter(|&&length| length >= min_line)
            .map(|&length| length as f64)
            .collect();
        if valid.is_empty() {
            return Ok(Self::default());
        }

        let valid = DVector::from_vec(valid);
        // nalgebra's variance divides by the number of elements.
        let (mean, std_dev) = (valid.mean(), valid.variance().sqrt());

        let mut freq = BTreeMap::new();
        for &length in lengths.iter().filter(|&&length| length >= min_line) {
            *freq.entry(length).or_insert(0) += 1;
        }
        let bins = freq
            .into_iter()
            .map(|(length, count)| HistogramBin { length, count })
            .collect();

        Ok(Self {
            bins,
            mean,
            std_dev,
            count: valid.len(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Count column as a frequency distribution.
    pub fn frequencies(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.count as f64).collect()
    }

    /// Longest line length in the histogram, 0 if empty.
    pub fn max_length(&self) -> usize {
        self.bins.last().map_or(0, |bin| bin.length)
    }

    /// Number of recurrent points lying on counted lines, `Σ length · count`.
    pub fn determined_points(&self) -> usize {
        self.bins.iter().map(|bin| bin.length * bin.count).sum()
    }
}
