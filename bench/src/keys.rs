//! Seeded key patterns for sparse storage benches.
//!
//! Every generator is deterministic for a given seed, so runs stay comparable.

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

/// Seed shared by benches that don't care which one they get.
pub const DEFAULT_SEED: u64 = 0x00c0_ffee;

/// Keys `0..count` in ascending order, as a fresh entity manager would issue them.
pub fn sequential(count: usize) -> Vec<usize> {
    (0..count).collect()
}

/// Keys `0..count` in a seeded random order.
pub fn shuffled(count: usize, seed: u64) -> Vec<usize> {
    let mut keys = sequential(count);
    keys.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    keys
}

/// `count` distinct keys spread over `count * spread`, ascending.
///
/// Models a store holding a component that only a fraction of entities carry.
pub fn sparse(count: usize, spread: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spread = spread.max(1);
    (0..count)
        .map(|i| i * spread + rng.gen_range(0..spread))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn shuffled_is_a_permutation() {
        let keys = shuffled(500, DEFAULT_SEED);
        assert_eq!(keys.iter().copied().collect::<HashSet<_>>().len(), 500);
        assert_ne!(keys, sequential(500));
        assert_eq!(keys, shuffled(500, DEFAULT_SEED));
    }

    #[test]
    fn sparse_keys_are_distinct_and_spread() {
        let keys = sparse(100, 8, 1);
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(*keys.last().unwrap() < 800);
    }
}
