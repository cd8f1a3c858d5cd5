//! Typed access to the diagonals of a square matrix.
//!
//! An `n x n` matrix has `2n - 1` diagonals, identified by a signed offset in
//! `-(n-1)..=(n-1)`. Offset 0 is the main diagonal, positive offsets lie above
//! it (`col = row + offset`) and negative offsets below (`row = col - offset`).

/// One diagonal of an `n x n` matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagonal {
    size: usize,
    offset: isize,
}

impl Diagonal {
    /// Diagonal at `offset` of an `size x size` matrix.
    ///
    /// An offset outside `-(size-1)..=(size-1)` yields an empty diagonal.
    pub fn new(size: usize, offset: isize) -> Self {
        Self { size, offset }
    }

    /// All `2n - 1` diagonals of an `n x n` matrix, from offset `-(n-1)` to `n-1`.
    pub fn all(size: usize) -> impl DoubleEndedIterator<Item = Diagonal> + ExactSizeIterator {
        let span = size as isize;
        (1 - span..span).map(move |offset| Diagonal::new(size, offset))
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Number of cells, `n - |offset|`.
    pub fn len(&self) -> usize {
        self.size.saturating_sub(self.offset.unsigned_abs())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matrix coordinates of the `k`-th cell, counted from the top-left end.
    pub fn cell(&self, k: usize) -> (usize, usize) {
        let shift = self.offset.unsigned_abs();
        if self.offset >= 0 {
            (k, k + shift)
        } else {
            (k + shift, k)
        }
    }

    /// `(row, col)` coordinates from the top-left end to the bottom-right end.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = (usize, usize)> {
        let diagonal = *self;
        (0..self.len()).map(move |k| diagonal.cell(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_all_offsets() {
        let offsets: Vec<isize> = Diagonal::all(4).map(|d| d.offset()).collect();
        assert_eq!(offsets, vec![-3, -2, -1, 0, 1, 2, 3]);
        let lengths: Vec<usize> = Diagonal::all(4).map(|d| d.len()).collect();
        assert_eq!(lengths, vec![1, 2, 3, 4, 3, 2, 1]);
    }

    #[test]
    fn cells_follow_offset_sign() {
        let upper: Vec<_> = Diagonal::new(4, 1).cells().collect();
        assert_eq!(upper, vec![(0, 1), (1, 2), (2, 3)]);
        let lower: Vec<_> = Diagonal::new(4, -2).cells().collect();
        assert_eq!(lower, vec![(2, 0), (3, 1)]);
        let main: Vec<_> = Diagonal::new(3, 0).cells().collect();
        assert_eq!(main, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn every_cell_visited_once() {
        let n = 5;
        let mut seen = vec![0usize; n * n];
        for diagonal in Diagonal::all(n) {
            for (row, col) in diagonal.cells() {
                assert_eq!(col as isize - row as isize, diagonal.offset());
                seen[row * n + col] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn out_of_range_is_empty() {
        assert!(Diagonal::new(3, 3).is_empty());
        assert!(Diagonal::new(3, -4).is_empty());
        assert_eq!(Diagonal::all(0).count(), 0);
    }
}
