//! A small, explicit, non-cryptographic PRNG owned by the graph.
//!
//! Determinism (P9: bit-identical replay across runs given the same seed)
//! requires an algorithm pinned in-crate rather than a third-party default
//! that may change between versions. This is a splitmix64 generator, the
//! same family commonly used to seed other PRNGs; here it's used directly
//! since the only consumer (the barycenter jitter, §4.6.1) needs a cheap
//! stream of doubles in `[0, 1)`, not cryptographic quality.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rng {
    state: u64,
}

use serde::{Deserialize, Serialize};

impl Rng {
    pub fn new(seed: u64) -> Self {
        // 0 is a valid seed for splitmix64, but keep it distinguishable from
        // an un-reseeded default for debugging.
        Self { state: seed ^ 0x9E37_79B9_7F4A_7C15 }
    }

    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// A double uniformly distributed in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn reseed_replays() {
        let mut r = Rng::new(7);
        let first: Vec<u64> = (0..8).map(|_| r.next_u64()).collect();
        r.reseed(7);
        let second: Vec<u64> = (0..8).map(|_| r.next_u64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn f64_in_unit_interval() {
        let mut r = Rng::new(1);
        for _ in 0..1000 {
            let x = r.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }
}
