//! Synthetic stock counts and freshness labels.
//!
//! There is no inventory backend; every store gets a stock count drawn from a
//! fixed distribution: 40% sold out, 30% in `1..=5`, 30% in `6..=15`.

use rand::seq::IndexedRandom;
use rand::Rng;

pub const SOLD_OUT_PROBABILITY: f64 = 0.40;
/// Cumulative probability of the sold-out and low buckets together.
pub const LOW_OR_SOLD_OUT_PROBABILITY: f64 = 0.70;

pub const UPDATE_LABELS: &[&str] = &["방금 전", "5분 전", "10분 전", "30분 전", "1시간 전"];

/// Draws a stock count from a single uniform roll.
pub fn sample_stock<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let roll: f64 = rng.random();
    if roll < SOLD_OUT_PROBABILITY {
        0
    } else if roll < LOW_OR_SOLD_OUT_PROBABILITY {
        rng.random_range(1..=5)
    } else {
        rng.random_range(6..=15)
    }
}

pub fn sample_update_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    UPDATE_LABELS
        .choose(rng)
        .copied()
        .unwrap_or(UPDATE_LABELS[0])
        .to_string()
}
