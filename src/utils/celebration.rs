use rand::seq::SliceRandom;
use rand::Rng;
use crate::models::AggregateResult;

pub const DEFAULT_THRESHOLD: f64 = 9.0;
const CONFETTI: [&str; 6] = ["🎉", "🎊", "✨", "🌟", "🥳", "🎈"];

pub fn should_celebrate(result: &AggregateResult, threshold: f64) -> bool {
    result.value >= threshold
}

/// A line of `width` randomly picked confetti glyphs.
pub fn confetti<R: Rng + ?Sized>(rng: &mut R, width: usize) -> String {
    (0..width)
        .filter_map(|_| CONFETTI.choose(&mut *rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}
