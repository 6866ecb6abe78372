//! Seeded pseudo-random number generator.
//!
//! Daily puzzles are generated by stateless workers that must agree on the
//! result, so the whole sequence is a function of the seed string. The hash
//! and the LCG constants are part of that contract and must not change.

use std::time::{SystemTime, UNIX_EPOCH};

/// Linear congruential generator seeded from a string.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from a seed string.
    ///
    /// The seed is folded into a 32-bit rolling hash over its UTF-16 code
    /// units (`hash = hash*32 - hash + unit`, wrapping); the initial state is
    /// the absolute value of the hash, forced non-zero.
    pub fn from_seed(seed: &str) -> Self {
        let mut hash: i32 = 0;
        for unit in seed.encode_utf16() {
            hash = hash
                .wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(unit as i32);
        }
        let state = (hash as i64).unsigned_abs();
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Create a generator seeded from the current time in milliseconds.
    ///
    /// The only non-deterministic constructor; used when no seed is supplied.
    pub fn from_clock() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self::from_seed(&millis.to_string())
    }

    /// Next value in [0, 1).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * 9301 + 49297) % 233280;
        self.state as f64 / 233280.0
    }

    /// Uniform integer in `min..=max`.
    pub fn randint(&mut self, min: usize, max: usize) -> usize {
        (self.next() * (max - min + 1) as f64) as usize + min
    }

    /// Pick one element. `items` must be non-empty.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next() * items.len() as f64) as usize]
    }

    /// Fisher-Yates shuffle into a new vector; the input is left as is.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut result = items.to_vec();
        for i in (1..result.len()).rev() {
            let j = (self.next() * (i + 1) as f64) as usize;
            result.swap(i, j);
        }
        result
    }
}
