//! Seeded DJB2 hash used as the sort key for shuffled listings.

const DJB2_INIT: u32 = 5381;
const SEED_SCALE: f64 = 1e9;

/// Deterministic 32-bit hash of `s` mixed with `seed`.
///
/// The accumulator starts at `floor(seed * 1e9) ^ 5381` and folds in every
/// UTF-16 code unit as `h * 33 + unit`, wrapping at 32 bits. Identical
/// `(s, seed)` pairs always produce identical values.
// Seeds live in [0, 1), so the scaled value fits in u32; out-of-range seeds
// saturate, which keeps the function total.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn stable_hash(s: &str, seed: f64) -> u32 {
    let scaled = (seed * SEED_SCALE).floor() as u32;
    s.encode_utf16().fold(scaled ^ DJB2_INIT, |h, unit| {
        h.wrapping_mul(33).wrapping_add(u32::from(unit))
    })
}
