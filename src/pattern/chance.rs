// Chance helpers - Weighted coin flips and uniform picks
// All randomness flows through a caller-supplied `Rng`

use rand::Rng;

/// Bernoulli draw; `p` is clamped into [0, 1]
pub fn coin<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Uniform pick from a non-empty slice
///
/// Callers only pass fixed, non-empty tables.
pub fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    debug_assert!(!items.is_empty(), "pick from empty slice");
    items[rng.gen_range(0..items.len())]
}
