use log::trace;

use crate::equiv::signature::MatrixSignature;
use crate::matrix::Matrix;

/// `map[i]` is the vertex of the right-hand matrix that vertex `i` of the
/// left-hand matrix corresponds to: `left[i][j] == right[map[i]][map[j]]`.
pub type RowMap = Vec<usize>;

#[derive(Debug, Default, Clone)]
pub struct CheckerStats {
    pub checks: usize,
    pub signature_rejects: usize,
    pub candidate_rejects: usize,
    pub searches: usize,
    pub matches: usize,
}

/// Sorted copies of every row and column, compared as multisets.
#[derive(Debug, Clone, Default)]
struct LineProfiles {
    rows: Vec<Vec<i32>>,
    columns: Vec<Vec<i32>>,
}

impl LineProfiles {
    fn with_size(size: usize) -> Self {
        Self {
            rows: vec![Vec::with_capacity(size); size],
            columns: vec![Vec::with_capacity(size); size],
        }
    }

    fn load(&mut self, matrix: &Matrix) {
        for (idx, row) in matrix.rows().enumerate() {
            let target = &mut self.rows[idx];
            target.clear();
            target.extend_from_slice(row);
            target.sort_unstable();
        }
        for (idx, target) in self.columns.iter_mut().enumerate() {
            target.clear();
            target.extend(matrix.column(idx));
            target.sort_unstable();
        }
    }
}

/// Decides whether two matrices of one fixed size are related by a
/// simultaneous row and column permutation.
///
/// The check runs in stages: signature comparison, a candidate table
/// pairing vertices whose row and column multisets agree, and finally a
/// backtracking search over the candidate table. Scratch buffers are kept
/// between calls.
#[derive(Debug, Clone)]
pub struct EquivalenceChecker {
    size: usize,
    left: LineProfiles,
    right: LineProfiles,
    candidates: Vec<Vec<usize>>,
    assignment: Vec<usize>,
    used: Vec<bool>,
    last_map: RowMap,
    stats: CheckerStats,
}

impl EquivalenceChecker {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            left: LineProfiles::with_size(size),
            right: LineProfiles::with_size(size),
            candidates: vec![Vec::with_capacity(size); size],
            assignment: vec![0; size],
            used: vec![false; size],
            last_map: Vec::with_capacity(size),
            stats: CheckerStats::default(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn stats(&self) -> &CheckerStats {
        &self.stats
    }

    /// Row map found by the most recent successful [`are_equivalent`] call.
    ///
    /// [`are_equivalent`]: EquivalenceChecker::are_equivalent
    pub fn last_row_map(&self) -> &[usize] {
        &self.last_map
    }

    /// Matrices of different sizes are never equivalent. Panics when the
    /// matrices do not have the size this checker was built for.
    pub fn are_equivalent(&mut self, left: &Matrix, right: &Matrix) -> bool {
        if left.size() != right.size() {
            return false;
        }
        self.expect_size(left);
        self.stats.checks += 1;

        if MatrixSignature::of(left) != MatrixSignature::of(right) {
            self.stats.signature_rejects += 1;
            return false;
        }

        self.build_candidates(left, right);
        if self.candidates.iter().any(Vec::is_empty) {
            self.stats.candidate_rejects += 1;
            return false;
        }

        self.stats.searches += 1;
        let mut found = None;
        self.search(left, right, 0, &mut |map: &[usize]| {
            found = Some(map.to_vec());
            true
        });

        match found {
            Some(map) => {
                debug_assert!(validates(left, right, &map));
                self.stats.matches += 1;
                self.last_map = map;
                true
            }
            None => {
                trace!("Candidate search exhausted for size {}", self.size);
                false
            }
        }
    }

    /// Every row map relating `left` to `right`, in lexicographic order.
    ///
    /// Intended for matrices already known to be equivalent, so the
    /// signature rejection is skipped.
    pub fn valid_row_maps(&mut self, left: &Matrix, right: &Matrix) -> Vec<RowMap> {
        if left.size() != right.size() {
            return Vec::new();
        }
        self.expect_size(left);
        self.build_candidates(left, right);

        let mut maps = Vec::new();
        self.search(left, right, 0, &mut |map: &[usize]| {
            maps.push(map.to_vec());
            false
        });
        maps
    }

    fn expect_size(&self, matrix: &Matrix) {
        assert_eq!(
            matrix.size(),
            self.size,
            "equivalence checker for size {} given a matrix of size {}",
            self.size,
            matrix.size()
        );
    }

    fn build_candidates(&mut self, left: &Matrix, right: &Matrix) {
        let Self {
            size,
            left: left_lines,
            right: right_lines,
            candidates,
            ..
        } = self;
        left_lines.load(left);
        right_lines.load(right);
        for (a, pool) in candidates.iter_mut().enumerate() {
            pool.clear();
            let row = &left_lines.rows[a];
            let column = &left_lines.columns[a];
            pool.extend((0..*size).filter(|&b| {
                right_lines.rows[b] == *row && right_lines.columns[b] == *column
            }));
        }
    }

    /// Assign rows in order, checking each new pair against every row
    /// already placed. `visit` returns true to stop the search.
    fn search(
        &mut self,
        left: &Matrix,
        right: &Matrix,
        row: usize,
        visit: &mut dyn FnMut(&[usize]) -> bool,
    ) -> bool {
        if row == self.size {
            return visit(&self.assignment);
        }
        for slot in 0..self.candidates[row].len() {
            let target = self.candidates[row][slot];
            if self.used[target] || !self.consistent(left, right, row, target) {
                continue;
            }
            self.used[target] = true;
            self.assignment[row] = target;
            let stop = self.search(left, right, row + 1, visit);
            self.used[target] = false;
            if stop {
                return true;
            }
        }
        false
    }

    fn consistent(&self, left: &Matrix, right: &Matrix, row: usize, target: usize) -> bool {
        if left[(row, row)] != right[(target, target)] {
            return false;
        }
        self.assignment[..row].iter().enumerate().all(|(prev, &mapped)| {
            left[(row, prev)] == right[(target, mapped)]
                && left[(prev, row)] == right[(mapped, target)]
        })
    }
}

/// Permuting the rows of `left` by `map` and the columns of `right` by its
/// inverse must give the same matrix; entrywise that is the condition below.
fn validates(left: &Matrix, right: &Matrix, map: &[usize]) -> bool {
    let n = left.size();
    (0..n).all(|i| (0..n).all(|j| left[(i, j)] == right[(map[i], map[j])]))
}
