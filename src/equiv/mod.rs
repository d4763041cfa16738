pub mod cache;
pub mod checker;
pub mod signature;

pub use cache::CheckerCache;
pub use checker::{CheckerStats, EquivalenceChecker, RowMap};
pub use signature::{LineSum, MatrixSignature};
