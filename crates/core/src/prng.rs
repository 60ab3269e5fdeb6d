//! Seedable Xorshift64 generator.
//!
//! Field rebuilds draw every initial position, velocity, radius and pulse
//! phase from this generator, so a scene built from the same seed and
//! viewport is reproducible frame for frame (snapshots, tests). The browser
//! build seeds it from the clock.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Xorshift64 PRNG with the (13, 7, 17) shift triple.
///
/// A zero seed is a fixed point of xorshift and is replaced by a constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1), from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform in [-half_width, half_width). Used for initial velocities.
    pub fn next_symmetric(&mut self, half_width: f64) -> f64 {
        self.next_range(-half_width, half_width)
    }

    /// Uniform angle in [0, 2π). Used for pulse phases.
    pub fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_for_seed_42_is_stable() {
        // Changing this breaks every recorded snapshot seed.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for i in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    #[test]
    fn symmetric_range_is_centered() {
        let mut rng = Xorshift64::new(3);
        let mut sum = 0.0;
        for _ in 0..20_000 {
            let v = rng.next_symmetric(0.25);
            assert!((-0.25..0.25).contains(&v));
            sum += v;
        }
        assert!((sum / 20_000.0).abs() < 0.01);
    }

    #[test]
    fn angle_is_within_full_turn() {
        let mut rng = Xorshift64::new(11);
        for _ in 0..1000 {
            let a = rng.next_angle();
            assert!((0.0..TAU).contains(&a));
        }
    }

    #[test]
    fn state_survives_serde() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..10 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        assert_eq!(rng.next_u64(), restored.next_u64());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_range_stays_in_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                width in 1e-3_f64..1e4,
            ) {
                let mut rng = Xorshift64::new(seed);
                let max = min + width;
                for _ in 0..64 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} outside [{min}, {max})");
                }
            }

            #[test]
            fn next_index_stays_below_len(seed: u64, len in 1_usize..5_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..64 {
                    prop_assert!(rng.next_index(len) < len);
                }
            }
        }
    }
}
