use intro_engine::{RandomSource, Rng};

/// `Math.random` as a [`RandomSource`].
pub struct JsRandom;

impl RandomSource for JsRandom {
    fn next_int(&mut self, upper_bound: u32) -> u32 {
        let v = (js_sys::Math::random() * upper_bound as f64).floor() as u32;
        v.min(upper_bound.saturating_sub(1))
    }

    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Random source for one scrambler. Seeded runs give each `stream` its own
/// sequence so the name and role fields don't mirror each other.
pub fn random_source(seed: Option<u64>, stream: u64) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(Rng::new(seed.wrapping_add(stream.wrapping_mul(7919)))),
        None => Box::new(JsRandom),
    }
}
