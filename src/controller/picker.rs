//! Selection of one meal out of a lookup result.

use rand::Rng;

/// Chooses an index into a non-empty candidate list.
pub trait MealPicker: Send + Sync {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice: `floor(r * len)` with `r` uniform over `[0, 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl MealPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        let r: f64 = rand::thread_rng().gen();
        // `r * len` can round up to `len` for huge lists; clamp back into range.
        ((r * len as f64).floor() as usize).min(len.saturating_sub(1))
    }
}

/// Always picks the same index (clamped to the list), for deterministic runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl MealPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}
