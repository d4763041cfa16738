use std::ops::{Index, IndexMut};

/// Square integer matrix stored row-major.
///
/// Quiver matrices are expected to be skew-symmetric, but nothing here
/// enforces it; see [`Matrix::is_skew_symmetric`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Matrix {
    size: usize,
    data: Vec<i32>,
}

/// Entries of this magnitude or larger only occur in mutation-infinite classes.
pub const INFINITE_ENTRY: i32 = 3;

impl Matrix {
    pub fn zero(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    /// Wrap row-major data. Callers have already validated the length.
    pub(crate) fn from_parts(size: usize, data: Vec<i32>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        // chunks(0) panics, so the empty matrix yields no rows explicitly.
        self.data.chunks(self.size.max(1)).take(self.size)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = i32> + '_ {
        assert!(col < self.size, "column {col} out of range for size {}", self.size);
        self.data.iter().skip(col).step_by(self.size).copied()
    }

    pub fn is_skew_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i..self.size).all(|j| self[(i, j)] == -self[(j, i)]))
    }

    /// Cheap necessary condition for an infinite mutation class.
    pub fn is_infinite(&self) -> bool {
        self.data.iter().any(|value| value.abs() >= INFINITE_ENTRY)
    }

    /// Write the mutation of `self` at `vertex` into `out`.
    ///
    /// Row and column `vertex` are negated; every other entry `(i, j)` gains
    /// `sign(b_ik) * max(b_ik * b_kj, 0)`. `out` must have the same size and
    /// is overwritten completely. No allocation takes place.
    pub fn mutate(&self, vertex: usize, out: &mut Matrix) {
        assert_eq!(
            out.size, self.size,
            "mutation output buffer has size {}, expected {}",
            out.size, self.size
        );
        assert!(
            vertex < self.size,
            "mutation vertex {vertex} out of range for size {}",
            self.size
        );

        let n = self.size;
        let pivot = &self.data[vertex * n..(vertex + 1) * n];
        for i in 0..n {
            let b_ik = self.data[i * n + vertex];
            let src = &self.data[i * n..(i + 1) * n];
            let dst = &mut out.data[i * n..(i + 1) * n];
            if i == vertex {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = -s;
                }
                continue;
            }
            for j in 0..n {
                dst[j] = if j == vertex {
                    -src[j]
                } else {
                    let product = b_ik * pivot[j];
                    if product > 0 {
                        src[j] + b_ik.signum() * product
                    } else {
                        src[j]
                    }
                };
            }
        }
    }

    pub fn mutated(&self, vertex: usize) -> Matrix {
        let mut out = Matrix::zero(self.size);
        self.mutate(vertex, &mut out);
        out
    }

    /// Simultaneously permute rows and columns: `out[i][j] = self[p[i]][p[j]]`.
    pub fn permuted(&self, permutation: &[usize]) -> Matrix {
        assert_eq!(
            permutation.len(),
            self.size,
            "permutation length {} does not match size {}",
            permutation.len(),
            self.size
        );
        let mut hit = vec![false; self.size];
        for &p in permutation {
            assert!(p < self.size && !hit[p], "{permutation:?} is not a permutation");
            hit[p] = true;
        }
        self.principal(permutation)
    }

    /// Principal submatrix on the given vertices, in the given order.
    pub fn submatrix(&self, indices: &[usize]) -> Matrix {
        let mut hit = vec![false; self.size];
        for &idx in indices {
            assert!(
                idx < self.size,
                "submatrix index {idx} out of range for size {}",
                self.size
            );
            assert!(!hit[idx], "submatrix index {idx} repeated");
            hit[idx] = true;
        }
        self.principal(indices)
    }

    fn principal(&self, indices: &[usize]) -> Matrix {
        let size = indices.len();
        let mut data = Vec::with_capacity(size * size);
        for &i in indices {
            for &j in indices {
                data.push(self[(i, j)]);
            }
        }
        Matrix::from_parts(size, data)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = i32;

    fn index(&self, (row, col): (usize, usize)) -> &i32 {
        assert!(row < self.size && col < self.size, "index ({row}, {col}) out of range");
        &self.data[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut i32 {
        assert!(row < self.size && col < self.size, "index ({row}, {col}) out of range");
        &mut self.data[row * self.size + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixLoader;

    fn a3() -> Matrix {
        MatrixLoader::from_rows(vec![vec![0, 1, 0], vec![-1, 0, 1], vec![0, -1, 0]])
            .expect("a3 matrix")
    }

    #[test]
    fn mutation_at_middle_vertex_closes_triangle() {
        let mutated = a3().mutated(1);
        let expected =
            MatrixLoader::from_rows(vec![vec![0, -1, 1], vec![1, 0, -1], vec![-1, 1, 0]])
                .expect("oriented triangle");
        assert_eq!(mutated, expected);
    }

    #[test]
    fn mutation_is_an_involution() {
        let seeds = [
            a3(),
            MatrixLoader::from_rows(vec![vec![0, 2, -2], vec![-2, 0, 2], vec![2, -2, 0]])
                .expect("markov"),
            MatrixLoader::from_rows(vec![
                vec![0, 1, -1, 0],
                vec![-1, 0, 2, 1],
                vec![1, -2, 0, -1],
                vec![0, -1, 1, 0],
            ])
            .expect("rank four"),
        ];
        for seed in seeds {
            for k in 0..seed.size() {
                assert_eq!(seed.mutated(k).mutated(k), seed, "vertex {k} of {seed}");
            }
        }
    }

    #[test]
    fn mutate_overwrites_dirty_buffer() {
        let seed = a3();
        let mut out = Matrix::zero(3);
        out[(0, 0)] = 7;
        out[(2, 1)] = -9;
        seed.mutate(0, &mut out);
        assert_eq!(out, seed.mutated(0));
        assert_eq!(out[(0, 0)], 0);
    }

    #[test]
    #[should_panic(expected = "mutation output buffer")]
    fn mutate_rejects_mismatched_buffer() {
        let mut out = Matrix::zero(2);
        a3().mutate(0, &mut out);
    }

    #[test]
    fn infinite_detection_uses_entry_magnitude() {
        assert!(!a3().is_infinite());
        let mut m = a3();
        m[(0, 2)] = -3;
        m[(2, 0)] = 3;
        assert!(m.is_infinite());
        assert!(m.is_skew_symmetric());
    }

    #[test]
    fn permutation_and_submatrix() {
        let m = a3();
        let p = m.permuted(&[2, 0, 1]);
        assert_eq!(p[(0, 1)], m[(2, 0)]);
        assert_eq!(p[(1, 2)], m[(0, 1)]);

        let sub = m.submatrix(&[1, 2]);
        assert_eq!(sub.size(), 2);
        assert_eq!(sub.row(0), &[0, 1]);
        assert_eq!(m.column(1).collect::<Vec<_>>(), vec![1, 0, -1]);
        assert_eq!(m.rows().count(), 3);
        assert_eq!(Matrix::zero(0).rows().count(), 0);
    }

    #[test]
    #[should_panic(expected = "not a permutation")]
    fn permuted_rejects_repeats() {
        a3().permuted(&[0, 0, 1]);
    }
}
