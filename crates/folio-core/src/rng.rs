#![forbid(unsafe_code)]

//! Deterministic pseudo-random source.
//!
//! Every randomised decision in the site (preloader increments, pendulum
//! direction, scramble glyphs) draws from a [`SeededRng`] so that a run is
//! fully reproducible from its seed. The generator is a 64-bit LCG; ranges are
//! taken from the high bits, which have the longest period.

/// Seeded linear congruential generator.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from `seed`. Equal seeds yield equal sequences.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform value in `min..max`. Returns `min` when the range is empty.
    pub fn next_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.next_u32() % (max - min)
    }

    /// Uniform value in `min..=max`. Returns `min` when the range is empty.
    pub fn next_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        // `max - min + 1` does not fit a u32 for the full range.
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32()) % span) as u32
    }

    /// Uniform index into a slice of length `len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u32() as usize) % len.max(1)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// `1.0` or `-1.0` with equal probability.
    pub fn sign(&mut self) -> f32 {
        if self.chance(0.5) { 1.0 } else { -1.0 }
    }
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let same = (0..16).filter(|_| a.next_u64() == b.next_u64()).count();
        assert!(same < 16);
    }

    #[test]
    fn inclusive_range_hits_both_ends() {
        let mut rng = SeededRng::new(7);
        let draws: Vec<u32> = (0..2000).map(|_| rng.next_inclusive(1, 5)).collect();
        assert!(draws.iter().all(|v| (1..=5).contains(v)));
        assert!(draws.contains(&1));
        assert!(draws.contains(&5));
    }

    #[test]
    fn inclusive_range_spanning_all_of_u32() {
        let mut rng = SeededRng::new(13);
        for _ in 0..100 {
            let _ = rng.next_inclusive(0, u32::MAX);
        }
        let top: Vec<u32> = (0..200).map(|_| rng.next_inclusive(u32::MAX - 1, u32::MAX)).collect();
        assert!(top.iter().all(|&v| v >= u32::MAX - 1));
        assert!(top.contains(&u32::MAX));
    }

    #[test]
    fn empty_range_returns_min() {
        let mut rng = SeededRng::new(3);
        assert_eq!(rng.next_range(4, 4), 4);
        assert_eq!(rng.next_inclusive(9, 2), 9);
    }

    #[test]
    fn unit_float_in_bounds() {
        let mut rng = SeededRng::new(11);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn sign_produces_both_directions() {
        let mut rng = SeededRng::new(5);
        let signs: Vec<f32> = (0..200).map(|_| rng.sign()).collect();
        assert!(signs.contains(&1.0));
        assert!(signs.contains(&-1.0));
    }
}
