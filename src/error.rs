//! Error types shared by every stage of the RQA pipeline.

use std::fmt;

/// Pipeline stage a wrapped error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Thresholding,
    LineExtraction,
    Histogram,
    Entropy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Thresholding => "thresholding",
            Stage::LineExtraction => "line extraction",
            Stage::Histogram => "line histogram",
            Stage::Entropy => "entropy",
        };
        f.write_str(name)
    }
}

/// Crate-level error type.
///
/// Every operation validates its own preconditions and fails with one of the
/// variants below. The orchestrator wraps failures of its stages in
/// [`RqaError::Stage`]; use [`RqaError::root`] to reach the violated
/// precondition.
#[derive(Debug, thiserror::Error)]
pub enum RqaError {
    /// Embedding parameters leave no usable points.
    #[error("invalid embedding: {reason}")]
    InvalidEmbedding { reason: String },

    /// Matrix is not square or operands have mismatched shapes.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeError { expected: String, got: String },

    /// Matrix is too small to be meaningful.
    #[error("degenerate input: matrix of size {size}x{size}")]
    DegenerateInput { size: usize },

    /// Threshold radius must be strictly positive.
    #[error("invalid radius {0}: must be > 0")]
    InvalidRadius(f64),

    /// Theiler window wider than the matrix.
    #[error("invalid diag_ignore {diag_ignore} for a {size}x{size} matrix")]
    InvalidDiagIgnore { diag_ignore: usize, size: usize },

    /// Minimum line length must be at least 1.
    #[error("invalid minimum line length {0}: must be >= 1")]
    InvalidMinLength(usize),

    /// Number of entropy states must be at least 1.
    #[error("invalid number of states {0}: must be >= 1")]
    InvalidStateCount(usize),

    /// Recurrence matrix contains no diagonal lines.
    #[error("no recurrent points found")]
    NoRecurrence,

    /// Frequency distribution cannot be normalised.
    #[error("degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// A user supplied distance metric failed.
    #[error("distance metric failed: {0}")]
    Metric(#[from] anyhow::Error),

    /// Failure of one orchestrator stage.
    #[error("failure during {stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<RqaError>,
    },
}

impl RqaError {
    /// Wraps `self` with the stage it occurred in.
    pub fn in_stage(self, stage: Stage) -> Self {
        RqaError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any stage wrappers.
    pub fn root(&self) -> &RqaError {
        match self {
            RqaError::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage the error was raised in, if it came through the orchestrator.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RqaError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Convenience Result type for RQA operations.
pub type Result<T> = std::result::Result<T, RqaError>;
