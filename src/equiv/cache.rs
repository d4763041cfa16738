use indexmap::IndexMap;

use crate::equiv::checker::{CheckerStats, EquivalenceChecker, RowMap};
use crate::matrix::Matrix;

/// Equivalence checkers keyed by matrix size, created on first use.
///
/// Owned by whoever runs the comparisons (usually a
/// [`MutationClassLoader`](crate::class::MutationClassLoader)), so scratch
/// buffers are reused without any process-wide state.
#[derive(Debug, Clone, Default)]
pub struct CheckerCache {
    checkers: IndexMap<usize, EquivalenceChecker>,
}

impl CheckerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checker(&mut self, size: usize) -> &mut EquivalenceChecker {
        self.checkers
            .entry(size)
            .or_insert_with(|| EquivalenceChecker::new(size))
    }

    pub fn are_equivalent(&mut self, left: &Matrix, right: &Matrix) -> bool {
        left.size() == right.size() && self.checker(left.size()).are_equivalent(left, right)
    }

    /// Row map from `left` onto `right`, if they are equivalent.
    pub fn row_map(&mut self, left: &Matrix, right: &Matrix) -> Option<RowMap> {
        if left.size() != right.size() {
            return None;
        }
        let checker = self.checker(left.size());
        checker
            .are_equivalent(left, right)
            .then(|| checker.last_row_map().to_vec())
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Counters summed over every cached checker.
    pub fn stats(&self) -> CheckerStats {
        self.checkers
            .values()
            .fold(CheckerStats::default(), |mut total, checker| {
                let stats = checker.stats();
                total.checks += stats.checks;
                total.signature_rejects += stats.signature_rejects;
                total.candidate_rejects += stats.candidate_rejects;
                total.searches += stats.searches;
                total.matches += stats.matches;
                total
            })
    }
}
