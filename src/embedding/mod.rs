//! Phase-space embedding and distance computation.
//!
//! - `points`: time-delay and multivariate embeddings.
//! - `distance`: pairwise distance matrices between embedded points.
pub mod distance;
pub mod points;
