use crate::matrix::Matrix;

/// Sum and absolute sum of a single row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineSum {
    pub sum: i64,
    pub abs_sum: i64,
}

impl LineSum {
    fn of(values: impl Iterator<Item = i32>) -> Self {
        values.fold(Self { sum: 0, abs_sum: 0 }, |acc, value| Self {
            sum: acc.sum + i64::from(value),
            abs_sum: acc.abs_sum + i64::from(value.abs()),
        })
    }
}

/// Permutation-invariant summary of a matrix: the multisets of row and
/// column sums. Equivalent matrices always share a signature, so it serves as
/// the hash key for deduplication and as the first rejection test.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatrixSignature {
    rows: Vec<LineSum>,
    columns: Vec<LineSum>,
}

impl MatrixSignature {
    pub fn of(matrix: &Matrix) -> Self {
        let mut rows: Vec<LineSum> = matrix
            .rows()
            .map(|row| LineSum::of(row.iter().copied()))
            .collect();
        let mut columns: Vec<LineSum> = (0..matrix.size())
            .map(|col| LineSum::of(matrix.column(col)))
            .collect();
        rows.sort_unstable();
        columns.sort_unstable();
        Self { rows, columns }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[LineSum] {
        &self.rows
    }

    pub fn columns(&self) -> &[LineSum] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_ignores_vertex_order() {
        let m: Matrix = "{ {0 1 -1 0} {-1 0 2 1} {1 -2 0 -1} {0 -1 1 0} }"
            .parse()
            .expect("parse");
        let p = m.permuted(&[3, 1, 0, 2]);
        assert_ne!(m, p);
        assert_eq!(MatrixSignature::of(&m), MatrixSignature::of(&p));
    }

    #[test]
    fn signature_separates_orientations_with_distinct_sums() {
        let chain: Matrix = "{ {0 1 0} {-1 0 1} {0 -1 0} }".parse().expect("chain");
        let sink: Matrix = "{ {0 1 0} {-1 0 -1} {0 1 0} }".parse().expect("sink");
        assert_ne!(MatrixSignature::of(&chain), MatrixSignature::of(&sink));
        assert_eq!(MatrixSignature::of(&chain).size(), 3);
        assert_eq!(
            MatrixSignature::of(&sink).rows()[0],
            LineSum { sum: -2, abs_sum: 2 }
        );
    }
}
