use num_traits::Zero;

use crate::{error::Result, floating_type_mod::FT, particle_vec::alloc_filled};

/// Dense `n x n` row-major matrix with one slot per ordered particle pair.
///
/// Unlike [`crate::contact::ContactBuffer`], `(i, j)` and `(j, i)` are separate entries,
/// so force accumulation can index without normalizing the pair. Memory grows with `n^2`.
#[derive(Clone, Debug)]
pub struct PairMatrix {
    n: usize,
    data: Vec<FT>,
}

impl PairMatrix {
    /// `len` is `n * n`, checked by the caller.
    pub(crate) fn zeroed(buffer: &'static str, n: usize, len: usize) -> Result<Self> {
        debug_assert_eq!(n.checked_mul(n), Some(len));
        Ok(PairMatrix {
            n,
            data: alloc_filled(buffer, len, FT::zero())?,
        })
    }

    pub fn dimension(&self) -> usize {
        self.n
    }

    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        // an out-of-range column would otherwise land in the next row
        assert!(
            i < self.n && j < self.n,
            "pair ({}, {}) out of range for {} particles",
            i,
            j,
            self.n
        );
        i * self.n + j
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> FT {
        self.data[self.offset(i, j)]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, v: FT) {
        let k = self.offset(i, j);
        self.data[k] = v;
    }

    #[inline(always)]
    pub fn add(&mut self, i: usize, j: usize, v: FT) {
        let k = self.offset(i, j);
        self.data[k] += v;
    }

    /// All entries `(i, 0..n)`.
    pub fn row(&self, i: usize) -> &[FT] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn as_slice(&self) -> &[FT] {
        &self.data
    }

    pub fn reset(&mut self) {
        self.data.fill(FT::zero());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_pairs_are_distinct() {
        let mut m = PairMatrix::zeroed("test", 4, 16).unwrap();
        m.set(1, 2, 3.);
        assert_eq!(m.get(1, 2), 3.);
        assert_eq!(m.get(2, 1), 0.);

        m.add(1, 2, 0.5);
        m.add(2, 1, -1.);
        assert_eq!(m.get(1, 2), 3.5);
        assert_eq!(m.get(2, 1), -1.);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn column_past_the_end_is_rejected() {
        let m = PairMatrix::zeroed("test", 4, 16).unwrap();
        m.get(0, 4);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn write_past_the_end_does_not_wrap_into_next_row() {
        let mut m = PairMatrix::zeroed("test", 4, 16).unwrap();
        m.set(0, 4, 7.);
    }

    #[test]
    fn row_slices_line_up() {
        let mut m = PairMatrix::zeroed("test", 3, 9).unwrap();
        m.set(2, 0, 1.);
        m.set(2, 2, 2.);
        assert_eq!(m.row(2), &[1., 0., 2.]);
        assert_eq!(m.row(0), &[0., 0., 0.]);
        m.reset();
        assert!(m.as_slice().iter().all(|&x| x == 0.));
    }
}
