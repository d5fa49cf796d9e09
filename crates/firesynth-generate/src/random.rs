use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The single random source of a generation pass.
///
/// Every draw of a run goes through one instance, in a fixed order; callers
/// hold it by `&mut` so draws can never interleave.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl RandomSource {
    /// Seeded source; `None` draws the seed material from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self { rng, seed }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform float in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform float in `[low, high]`, one draw.
    pub fn uniform_between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.uniform()
    }

    /// Uniform integer in `[low, high]`.
    pub fn int_inclusive(&mut self, low: i64, high: i64) -> i64 {
        self.rng.random_range(low..=high)
    }

    /// Uniform pick from a fixed, non-empty array.
    pub fn pick<'a, T, const N: usize>(&mut self, items: &'a [T; N]) -> &'a T {
        const { assert!(N > 0, "cannot pick from an empty array") };
        &items[self.rng.random_range(0..N)]
    }

    /// Uniform pick from a slice; `None` when empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Pick a value with probability proportional to its weight.
    pub fn weighted<'a, T>(&mut self, items: &'a [(T, f64)]) -> Option<&'a T> {
        items
            .choose_weighted(&mut self.rng, |(_, weight)| *weight)
            .ok()
            .map(|(value, _)| value)
    }

    /// `amount` distinct items in draw order, capped at `items.len()`.
    pub fn sample<'a, T>(&mut self, items: &'a [T], amount: usize) -> Vec<&'a T> {
        let amount = amount.min(items.len());
        rand::seq::index::sample(&mut self.rng, items.len(), amount)
            .into_iter()
            .map(|index| &items[index])
            .collect()
    }

    /// Token of `len` uppercase ASCII letters.
    pub fn upper_token(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(self.rng.random_range(b'A'..=b'Z')))
            .collect()
    }

    /// Decimal digits, e.g. for external references.
    pub fn digits(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10_u8)))
            .collect()
    }

    /// Raw generator for adapters that take an `Rng`.
    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
