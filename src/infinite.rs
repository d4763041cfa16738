use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub walks: usize,
    pub steps: usize,
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            walks: 16,
            steps: 64,
            seed: None,
        }
    }
}

/// Looks for an infinite-type matrix along random mutation sequences.
///
/// A positive answer proves the class is infinite; a negative one proves
/// nothing. Walks are independent and run on the rayon pool.
pub struct RandomWalkCheck;

impl RandomWalkCheck {
    pub fn is_infinite(matrix: &Matrix, config: &WalkConfig) -> bool {
        if matrix.is_infinite() {
            return true;
        }
        // A single vertex only ever negates itself.
        if matrix.size() < 2 || config.steps == 0 {
            return false;
        }

        let base_seed = config.seed.unwrap_or_else(random_seed);
        let found = (0..config.walks).into_par_iter().any(|walk| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(base_seed.wrapping_add(walk as u64));
            walk_hits_infinite(matrix, config.steps, &mut rng)
        });
        if found {
            debug!("Random mutation walk reached an infinite-type matrix");
        }
        found
    }
}

fn walk_hits_infinite(matrix: &Matrix, steps: usize, rng: &mut Xoshiro256PlusPlus) -> bool {
    let size = matrix.size();
    let mut current = matrix.clone();
    let mut next = Matrix::zero(size);
    let mut last: Option<usize> = None;

    for _ in 0..steps {
        // Repeating the previous vertex would just undo it.
        let vertex = match last {
            None => rng.gen_range(0..size),
            Some(prev) => {
                let pick = rng.gen_range(0..size - 1);
                if pick >= prev {
                    pick + 1
                } else {
                    pick
                }
            }
        };
        current.mutate(vertex, &mut next);
        std::mem::swap(&mut current, &mut next);
        if current.is_infinite() {
            return true;
        }
        last = Some(vertex);
    }
    false
}

fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
