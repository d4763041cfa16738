use log::debug;

use crate::class::loader::MutationClassLoader;
use crate::class::model::ClassSize;
use crate::config::ClassConfig;
use crate::infinite::RandomWalkCheck;
use crate::matrix::Matrix;

pub fn class_size(seed: &Matrix) -> ClassSize {
    MutationClassLoader::new(seed.clone()).size()
}

/// Random walks first, exact enumeration only if they find nothing.
pub fn is_mutation_finite(seed: &Matrix, config: &ClassConfig) -> bool {
    if RandomWalkCheck::is_infinite(seed, &config.walk) {
        return false;
    }
    let size = MutationClassLoader::with_config(seed.clone(), config).size();
    debug!("Exact enumeration of {seed} gives class size {size}");
    size.is_finite()
}

/// Whether `other` is reachable from `seed` by mutations, up to relabelling.
pub fn mutation_equivalent(seed: &Matrix, other: &Matrix) -> bool {
    MutationClassLoader::new(seed.clone()).contains(other)
}
