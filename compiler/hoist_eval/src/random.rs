//! Deterministic generator behind `Math.random`.
//!
//! xorshift64: small, fast and reproducible from a seed, which is all a
//! script runner needs. Not suitable for anything security related.

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x2545_F491_4F6C_DD1D;

#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// A zero seed would make the generator emit zeros forever, so it is
    /// replaced by [`DEFAULT_SEED`].
    pub fn new(seed: u64) -> Self {
        XorShift64 {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
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

    /// Uniform in `[0, 1)`, using the top 53 bits.
    #[expect(
        clippy::cast_precision_loss,
        reason = "a 53-bit integer is exactly representable in f64"
    )]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = XorShift64::new(42);
        let mut b = XorShift64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_floats_stay_in_unit_interval() {
        let mut rng = XorShift64::new(7);
        for _ in 0..1000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "{x}");
        }
    }

    #[test]
    fn test_zero_seed_is_replaced() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }
}
