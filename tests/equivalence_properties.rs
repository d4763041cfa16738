use mutclass::{CheckerCache, EquivalenceChecker, Matrix, MatrixSignature};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const SAMPLES: usize = 60;

fn random_quiver(rng: &mut Xoshiro256PlusPlus, size: usize) -> Matrix {
    let mut m = Matrix::zero(size);
    for i in 0..size {
        for j in i + 1..size {
            let value = rng.gen_range(-2..=2);
            m[(i, j)] = value;
            m[(j, i)] = -value;
        }
    }
    m
}

fn random_permutation(rng: &mut Xoshiro256PlusPlus, size: usize) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..size).collect();
    perm.shuffle(rng);
    perm
}

#[test]
fn mutation_is_an_involution_on_random_quivers() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
    for size in 1..=8 {
        for _ in 0..SAMPLES {
            let m = random_quiver(&mut rng, size);
            let vertex = rng.gen_range(0..size);
            assert_eq!(m.mutated(vertex).mutated(vertex), m);
        }
    }
}

#[test]
fn mutation_commutes_with_relabelling() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
    let mut checkers = CheckerCache::new();
    for size in 2..=6 {
        for _ in 0..SAMPLES {
            let m = random_quiver(&mut rng, size);
            let perm = random_permutation(&mut rng, size);
            let p = m.permuted(&perm);
            let vertex = rng.gen_range(0..size);
            // p[i][j] = m[perm[i]][perm[j]], so vertex `vertex` of m is
            // the position of `vertex` in perm.
            let position = perm.iter().position(|&v| v == vertex).expect("permutation");
            assert_eq!(m.mutated(vertex).permuted(&perm), p.mutated(position));
            assert!(checkers.are_equivalent(&m.mutated(vertex), &p.mutated(position)));
        }
    }
}

#[test]
fn permutation_invariance_and_symmetry() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    for size in 0..=8 {
        let mut checker = EquivalenceChecker::new(size);
        for _ in 0..SAMPLES {
            let m = random_quiver(&mut rng, size);
            let perm = random_permutation(&mut rng, size);
            let p = m.permuted(&perm);
            assert!(checker.are_equivalent(&m, &m));
            assert!(checker.are_equivalent(&m, &p));
            let map = checker.last_row_map().to_vec();
            assert!((0..size).all(|i| (0..size).all(|j| m[(i, j)] == p[(map[i], map[j])])));
            assert!(checker.are_equivalent(&p, &m));
            assert_eq!(MatrixSignature::of(&m), MatrixSignature::of(&p));

            let other = random_quiver(&mut rng, size);
            assert_eq!(
                checker.are_equivalent(&m, &other),
                checker.are_equivalent(&other, &m)
            );
        }
    }
}

#[test]
fn every_listed_row_map_is_valid() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(31);
    let mut checker = EquivalenceChecker::new(5);
    for _ in 0..SAMPLES {
        // Sparse quivers have many symmetries.
        let mut m = Matrix::zero(5);
        for i in 0..5 {
            for j in i + 1..5 {
                if rng.gen_bool(0.3) {
                    m[(i, j)] = 1;
                    m[(j, i)] = -1;
                }
            }
        }
        let p = m.permuted(&random_permutation(&mut rng, 5));
        let maps = checker.valid_row_maps(&m, &p);
        assert!(!maps.is_empty());
        for map in &maps {
            assert!((0..5).all(|i| (0..5).all(|j| m[(i, j)] == p[(map[i], map[j])])));
        }
        let automorphisms = checker.valid_row_maps(&m, &m).len();
        assert_eq!(maps.len(), automorphisms);
    }
}
