use rand::seq::SliceRandom;
use rand::Rng;

/// Draws `count` elements uniformly at random without replacement. Callers
/// are expected to have checked that the pool is large enough; a short pool
/// yields the whole pool in random order.
pub(crate) fn draw_questions<T>(pool: Vec<T>, count: usize) -> Vec<T> {
    draw_with(&mut rand::thread_rng(), pool, count)
}

fn draw_with<R: Rng + ?Sized, T>(rng: &mut R, mut pool: Vec<T>, count: usize) -> Vec<T> {
    pool.partial_shuffle(rng, count);
    pool.truncate(count);
    pool
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn draws_exactly_count_distinct_elements_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<i64> = (0..100).collect();

        let drawn = draw_with(&mut rng, pool.clone(), 10);

        assert_eq!(drawn.len(), 10);
        let unique: HashSet<i64> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 10);
        assert!(drawn.iter().all(|item| pool.contains(item)));
    }

    #[test]
    fn full_pool_draw_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool: Vec<i64> = (0..20).collect();

        let mut drawn = draw_with(&mut rng, pool.clone(), 20);
        drawn.sort_unstable();
        assert_eq!(drawn, pool);
    }

    #[test]
    fn zero_count_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = draw_with(&mut rng, vec![1, 2, 3], 0);
        assert!(drawn.is_empty());
    }

    #[test]
    fn different_seeds_change_the_draw() {
        let pool: Vec<i64> = (0..1000).collect();
        let first = draw_with(&mut StdRng::seed_from_u64(1), pool.clone(), 5);
        let second = draw_with(&mut StdRng::seed_from_u64(2), pool, 5);
        assert_ne!(first, second);
    }
}
