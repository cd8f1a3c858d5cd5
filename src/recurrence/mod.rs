//! Recurrence matrices and their diagonal structure.
//!
//! - `threshold`: binarises a distance matrix and applies the Theiler window.
//! - `diagonal`: signed-offset access to the diagonals of a square matrix.
//! - `lines`: diagonal line extraction and density trends.
pub mod diagonal;
pub mod lines;
pub mod threshold;

/// Square binary matrix; 1 marks a recurrence, 0 its absence.
pub type RecurrenceMatrix = nalgebra::DMatrix<u8>;
