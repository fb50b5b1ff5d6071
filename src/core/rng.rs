//! Deterministic random number generation for setup, deck reshuffles and
//! search.
//!
//! Game states never hold a live RNG. Whenever a rule needs randomness (a
//! deck reshuffle, a stolen card) it derives a fresh stream from the game
//! seed and a counter stored in the state, so applying the same state
//! change to equal states always yields equal results.
//!
//! ```
//! use rust_factions::core::GameRng;
//!
//! let mut a = GameRng::stream(42, 3);
//! let mut b = GameRng::stream(42, 3);
//! assert_eq!(a.gen_range_usize(0..100), b.gen_range_usize(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG with forking for search simulations.
///
/// Uses ChaCha8 for speed while keeping streams independent.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Derive the `index`-th independent stream of `seed`.
    #[must_use]
    pub fn stream(seed: u64, index: u64) -> Self {
        Self::new(seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Fork this RNG into an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        Self::stream(self.seed, self.fork_counter)
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose an index with probability proportional to its weight.
    ///
    /// Returns `None` if weights are empty or sum to zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Rounding: fall back to the last positive weight.
        weights.iter().rposition(|&w| w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_streams_differ() {
        let mut a = GameRng::stream(42, 0);
        let mut b = GameRng::stream(42, 1);

        let seq1: Vec<_> = (0..10).map(|_| a.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| b.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);

        assert_eq!(rng1.fork().seed(), rng2.fork().seed());
        assert_ne!(rng1.fork().seed(), rng1.fork().seed());
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u8> = (0..20).collect();
        rng.shuffle(&mut data);
        data.sort_unstable();
        assert_eq!(data, (0..20).collect::<Vec<u8>>());
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = GameRng::new(42);

        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&[0.0, 5.0, 0.0]), Some(1));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }
}
