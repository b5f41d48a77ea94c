//! Round seeding: picks and shuffles the opening candidate set.

use rand::Rng;
use rand::seq::SliceRandom;

use super::errors::{BracketError, BracketResult};
use super::models::{Candidate, RoundSize};

/// Select the opening round from a candidate pool.
///
/// `RoundSize::All` returns a full random permutation of the pool.
/// `RoundSize::Of(n)` returns a uniformly random subset of exactly `n`
/// distinct candidates in random order. The caller's pool is never mutated.
///
/// The RNG is injected so tests can pass a seeded generator; production
/// callers pass `rand::rng()`.
///
/// # Errors
///
/// * `BracketError::PoolTooSmall` - fewer than 2 candidates in the pool
/// * `BracketError::InvalidRoundSize` - requested size is not a power of two >= 2
/// * `BracketError::RoundSizeExceedsPool` - requested size larger than the pool
pub fn select_round<R: Rng + ?Sized>(
    pool: &[Candidate],
    size: RoundSize,
    rng: &mut R,
) -> BracketResult<Vec<Candidate>> {
    if pool.len() < 2 {
        return Err(BracketError::PoolTooSmall(pool.len()));
    }

    let mut selected: Vec<Candidate> = pool.to_vec();
    selected.shuffle(rng);

    match size {
        RoundSize::All => Ok(selected),
        RoundSize::Of(requested) => {
            if requested < 2 || !requested.is_power_of_two() {
                return Err(BracketError::InvalidRoundSize(requested));
            }
            if requested > pool.len() {
                return Err(BracketError::RoundSizeExceedsPool {
                    requested,
                    available: pool.len(),
                });
            }
            // A shuffled prefix is a uniform sample without replacement.
            selected.truncate(requested);
            Ok(selected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::models::MediaKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn pool(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| {
                Candidate::new(
                    format!("candidate-{i}"),
                    format!("https://cdn.example.com/{i}.png"),
                    MediaKind::Image,
                )
            })
            .collect()
    }

    #[test]
    fn test_all_returns_full_permutation() {
        let pool = pool(7);
        let mut rng = StdRng::seed_from_u64(11);

        let round = select_round(&pool, RoundSize::All, &mut rng).expect("seed");
        assert_eq!(round.len(), 7);

        let names: HashSet<_> = round.iter().map(|c| c.name.as_str()).collect();
        let expected: HashSet<_> = pool.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_subset_is_exact_and_unique() {
        let pool = pool(20);
        let mut rng = StdRng::seed_from_u64(42);

        let round = select_round(&pool, RoundSize::Of(8), &mut rng).expect("seed");
        assert_eq!(round.len(), 8);

        let names: HashSet<_> = round.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), 8);
        for candidate in &round {
            assert!(pool.contains(candidate));
        }
    }

    #[test]
    fn test_pool_is_not_mutated() {
        let pool = pool(9);
        let before = pool.clone();
        let mut rng = StdRng::seed_from_u64(3);

        select_round(&pool, RoundSize::All, &mut rng).expect("seed");
        select_round(&pool, RoundSize::Of(4), &mut rng).expect("seed");
        assert_eq!(pool, before);
    }

    #[test]
    fn test_rejects_tiny_pool() {
        let pool = pool(1);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_round(&pool, RoundSize::All, &mut rng),
            Err(BracketError::PoolTooSmall(1))
        );
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let pool = pool(10);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_round(&pool, RoundSize::Of(6), &mut rng),
            Err(BracketError::InvalidRoundSize(6))
        );
        assert_eq!(
            select_round(&pool, RoundSize::Of(1), &mut rng),
            Err(BracketError::InvalidRoundSize(1))
        );
    }

    #[test]
    fn test_rejects_oversized_request() {
        let pool = pool(10);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_round(&pool, RoundSize::Of(16), &mut rng),
            Err(BracketError::RoundSizeExceedsPool {
                requested: 16,
                available: 10
            })
        );
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let pool = pool(12);

        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let round_a = select_round(&pool, RoundSize::Of(8), &mut rng_a).expect("seed");
        let round_b = select_round(&pool, RoundSize::Of(8), &mut rng_b).expect("seed");
        assert_eq!(round_a, round_b);
    }
}
