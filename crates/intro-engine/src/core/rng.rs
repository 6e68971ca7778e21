//! Random sources for scramble timing and glyph draws.
//!
//! Everything random in the engine goes through [`RandomSource`] so the host
//! can plug in `Math.random` while tests replay fixed draws.

/// A source of uniform random draws.
pub trait RandomSource {
    /// Uniform integer in [0, upper_bound). `upper_bound` must be non-zero.
    fn next_int(&mut self, upper_bound: u32) -> u32;

    /// Uniform float in [0, 1).
    fn next_unit(&mut self) -> f64;
}

/// Seedable pseudo-random number generator (xorshift64).
/// Used for seeded runs and in tests.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Rng {
    fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }

    fn next_unit(&mut self) -> f64 {
        // 53 high bits -> [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_int(&mut self, upper_bound: u32) -> u32 {
        (**self).next_int(upper_bound)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;
    use std::collections::VecDeque;

    /// Replays scripted draws. Integer draws and unit draws have separate
    /// queues; once a queue runs dry it keeps returning its fallback.
    #[derive(Debug, Default)]
    pub struct ScriptedRandom {
        ints: VecDeque<u32>,
        units: VecDeque<f64>,
        int_fallback: u32,
        unit_fallback: f64,
    }

    impl ScriptedRandom {
        pub fn new() -> Self {
            Self {
                unit_fallback: 0.99,
                ..Self::default()
            }
        }

        pub fn with_ints(mut self, ints: impl IntoIterator<Item = u32>) -> Self {
            self.ints.extend(ints);
            self
        }

        pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
            self.units.extend(units);
            self
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_int(&mut self, upper_bound: u32) -> u32 {
            let v = self.ints.pop_front().unwrap_or(self.int_fallback);
            v % upper_bound
        }

        fn next_unit(&mut self) -> f64 {
            self.units.pop_front().unwrap_or(self.unit_fallback)
        }
    }
}
