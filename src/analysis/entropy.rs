//! Shannon entropy of discrete distributions.
//!
//! In RQA the distribution is the line length histogram and the number of
//! states is the number of line lengths that could have occurred.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RqaError};

/// Shannon entropy (bits) and its distance to the maximum entropy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntropyAnalysis {
    /// `-Σ p · log2(p)` over non-zero probabilities.
    pub entropy: f64,
    /// `log2(nstates) - entropy`.
    pub deficit: f64,
}

impl EntropyAnalysis {
    /// Computes the Shannon entropy of `frequencies` over `nstates` states.
    ///
    /// Frequencies are normalised to probabilities; empty bins contribute 0.
    ///
    /// # Errors
    ///
    /// - [`RqaError::InvalidStateCount`] if `nstates` is 0.
    /// - [`RqaError::DegenerateDistribution`] if `frequencies` is empty,
    ///   contains a negative or non-finite value, or sums to zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rqa_algos::analysis::entropy::EntropyAnalysis;
    ///
    /// let uniform = EntropyAnalysis::shannon(&[3.0, 3.0, 3.0, 3.0], 4).unwrap();
    /// assert!((uniform.entropy - 2.0).abs() < 1e-12);
    /// assert!(uniform.deficit.abs() < 1e-12);
    /// ```
    pub fn shannon(frequencies: &[f64], nstates: usize) -> Result<Self> {
        if nstates < 1 {
            return Err(RqaError::InvalidStateCount(nstates));
        }
        if frequencies.is_empty() {
            return Err(RqaError::DegenerateDistribution(
                "distribution has no bins".into(),
            ));
        }
        if let Some(bad) = frequencies.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(RqaError::DegenerateDistribution(format!(
                "invalid frequency {bad}"
            )));
        }
        let total: f64 = frequencies.iter().sum();
        if total == 0.0 {
            return Err(RqaError::DegenerateDistribution(
                "sum of the distribution is zero".into(),
            ));
        }

        let entropy = frequencies
            .iter()
            .map(|&f| f / total)
            .filter(|&p| p > 0.0)
            .map(|p| -p * p.log2())
            .sum::<f64>();
        let max_entropy = (nstates as f64).log2();
        Ok(Self {
            entropy,
            deficit: max_entropy - entropy,
        })
    }
}
