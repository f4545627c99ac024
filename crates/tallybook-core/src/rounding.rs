//! Two-decimal-place rounding for surfaced monetary values
//!
//! Intermediate sums accumulate in full precision; every amount that
//! leaves the engine passes through `round2` exactly once at its final
//! accumulation point so day-over-day drift never becomes visible.

/// Round to two fractional digits, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
