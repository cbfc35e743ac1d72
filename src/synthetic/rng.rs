//! Park–Miller minimal standard generator
//!
//! `state = state * 16807 mod (2^31 - 1)`. Every draw advances the state once,
//! so a sequence is fully determined by the seed on any platform.

use std::f64::consts::PI;

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;
const NORMALIZER: f64 = 2_147_483_646.0;

/// Deterministic multiplicative linear-congruential generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Seed the generator. A seed congruent to zero maps to `MODULUS - 1`.
    pub fn new(seed: u64) -> Self {
        let state = match seed % MODULUS {
            0 => MODULUS - 1,
            s => s,
        };
        Self { state }
    }

    /// Current internal state
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance once and return the new state, in `[1, 2^31 - 2]`
    pub fn next_state(&mut self) -> u64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state
    }

    /// Uniform draw in `[lo, hi]`
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let u = (self.next_state() - 1) as f64 / NORMALIZER;
        lo + u * (hi - lo)
    }

    /// Normal draw via Box–Muller over two consecutive uniforms
    pub fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.uniform(0.0, 1.0).max(f64::MIN_POSITIVE);
        let u2 = self.uniform(0.0, 1.0);
        mu + sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Integer draw in `[lo, hi]` inclusive
    pub fn randint(&mut self, lo: i64, hi: i64) -> i64 {
        let value = self.uniform(lo as f64, (hi + 1) as f64).floor() as i64;
        value.min(hi)
    }

    /// Pick one element of a non-empty slice
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.uniform(0.0, 1.0) * items.len() as f64).floor() as usize;
        items.get(index.min(items.len() - 1))
    }
}
