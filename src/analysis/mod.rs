/// This module contains the quantification stages of recurrence analysis.
///
/// The available submodules are:
///
/// - `entropy`: Shannon entropy of the line length distribution.
/// - `histogram`: Line length histogram and statistics.
/// - `rqa`: The full RQA pipeline on a distance matrix or time series.
/// - `trend`: Least-squares trend of diagonal recurrence density.
pub mod entropy;
pub mod histogram;
pub mod rqa;
pub mod trend;
