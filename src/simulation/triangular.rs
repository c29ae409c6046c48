/*!
Index mapping for storage that holds one slot per unordered particle pair.

Pairs `{i, j}` with `i != j` are laid out row by row over the strictly lower
triangle of an `n x n` matrix: row `hi` holds the pairs `(hi, 0) .. (hi, hi - 1)`.
Self-pairs have no slot.
*/

/// Number of unordered pairs `{i, j}`, `i != j`, among `n` particles.
///
/// Returns `None` if the count does not fit into `usize`.
pub fn size_triangular_matrix(n: usize) -> Option<usize> {
    if n < 2 {
        return Some(0);
    }
    // one of n, n - 1 is even
    if n % 2 == 0 {
        (n / 2).checked_mul(n - 1)
    } else {
        n.checked_mul((n - 1) / 2)
    }
}

/// Slot of the pair `{i, j}`. Symmetric in its arguments.
#[inline(always)]
pub fn triangular_index(i: usize, j: usize) -> usize {
    debug_assert!(i != j, "self-pair ({}, {}) has no triangular slot", i, j);
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    hi * (hi - 1) / 2 + lo
}

/// Inverse of [`triangular_index`], returns `(lo, hi)` with `lo < hi`.
pub fn triangular_pair(index: usize) -> (usize, usize) {
    // largest hi with hi * (hi - 1) / 2 <= index
    let mut hi = ((((8 * index + 1) as f64).sqrt() + 1.) / 2.) as usize;
    while hi * (hi - 1) / 2 > index {
        hi -= 1;
    }
    while (hi + 1) * hi / 2 <= index {
        hi += 1;
    }
    (index - hi * (hi - 1) / 2, hi)
}
