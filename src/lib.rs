pub mod class;
pub mod config;
pub mod equiv;
pub mod infinite;
pub mod matrix;

pub use class::{
    class_size, is_mutation_finite, mutation_equivalent, ClassItem, ClassSize, ClassState,
    ExchangeGraph, Explorable, MutationClassLoader,
};
pub use config::ClassConfig;
pub use equiv::{CheckerCache, EquivalenceChecker, MatrixSignature, RowMap};
pub use infinite::{RandomWalkCheck, WalkConfig};
pub use matrix::{Matrix, MatrixLoader};
