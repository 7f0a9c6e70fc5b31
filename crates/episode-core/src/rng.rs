//! Deterministic pseudo-random number generator.
//!
//! A 32-bit linear-congruential generator with the Numerical Recipes
//! constants. Hand-rolled rather than pulled from an RNG crate because
//! the whole episode must replay bit-for-bit from a seed across
//! platforms and compiler versions; every draw goes through integer
//! arithmetic only.
//!
//! One `EpisodeRng` is created per episode and never reseeded. It is
//! passed by `&mut` through every component so generation is a pure
//! function of `(seed, config)`.

use std::time::{SystemTime, UNIX_EPOCH};

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;

/// Seeded LCG. Cloning preserves the stream position, which the tests
/// use to hand-verify draws against the recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRng {
    state: u32,
}

impl EpisodeRng {
    /// Seed the generator. Seeds wider than 32 bits are truncated.
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    /// Seed from the wall clock. Used by the CLI when no explicit seed
    /// is given; never called inside generation.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
            .unwrap_or(0);
        Self::new(nanos)
    }

    /// Advance the recurrence and return the raw 32-bit state.
    fn next_state(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state
    }

    /// Uniform integer in `[min, max)`.
    ///
    /// Caller contract: `max > min`. Equivalent to
    /// `min + floor(state / 2^32 * (max - min))` but computed without
    /// floats.
    pub fn draw(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(max > min, "draw range must be non-empty: [{min}, {max})");
        let state = self.next_state() as u64;
        let range = (max - min) as u64;
        min + ((state * range) >> 32) as i32
    }

    /// Probability gate: true with the given percent chance.
    ///
    /// All probabilistic branches in the generator go through this so
    /// the episode stays integer-only.
    pub fn chance(&mut self, percent: i32) -> bool {
        self.draw(0, 100) < percent
    }

    /// Uniform element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.draw(0, items.len() as i32) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_matches_hand_computation() {
        // state_1 = 1 * 1664525 + 1013904223 (mod 2^32)
        let mut rng = EpisodeRng::new(1);
        let expected_state = 1u64
            .wrapping_mul(MULTIPLIER as u64)
            .wrapping_add(INCREMENT as u64) as u32;
        let first = rng.draw(0, 2);
        assert_eq!(first, ((expected_state as u64 * 2) >> 32) as i32);
        assert_eq!(first, 0, "seed 1 yields 0 on the first draw(0, 2)");
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = EpisodeRng::new(42);
        let mut b = EpisodeRng::new(42);
        let xs: Vec<i32> = (0..200).map(|_| a.draw(0, 1000)).collect();
        let ys: Vec<i32> = (0..200).map(|_| b.draw(0, 1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = EpisodeRng::new(42);
        let mut b = EpisodeRng::new(43);
        let xs: Vec<i32> = (0..20).map(|_| a.draw(0, 1000)).collect();
        let ys: Vec<i32> = (0..20).map(|_| b.draw(0, 1000)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn draw_stays_in_range() {
        let mut rng = EpisodeRng::new(7);
        for _ in 0..10_000 {
            let v = rng.draw(-3, 4);
            assert!((-3..4).contains(&v));
        }
    }

    #[test]
    fn chance_extremes() {
        let mut rng = EpisodeRng::new(9);
        for _ in 0..100 {
            assert!(!rng.chance(0));
            assert!(rng.chance(100));
        }
    }

    #[test]
    fn pick_covers_all_indices() {
        let items = [10, 20, 30];
        let mut rng = EpisodeRng::new(5);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let v = rng.pick(&items);
            seen[items.iter().position(|x| x == v).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
