//! Deterministic ambient "vitality" signal.
//!
//! Every viewer of a world derives the same cosmetic sequence from the world's
//! stored seed and a shared server time anchor, so no server push is needed.
//! The output is a pure function of `(seed, now_ms)`. It is not gameplay
//! state and carries no security properties.

use serde::{Deserialize, Serialize};

/// Values produced per period.
pub const BUCKET_COUNT: usize = 20;
/// Length of one period of buckets.
pub const PERIOD_MS: i64 = 2_000;
/// Playback step of a single bucket.
pub const STEP_MS: i64 = PERIOD_MS / BUCKET_COUNT as i64;
/// Length of the slow activity sawtooth.
pub const ACTIVITY_CYCLE_SECS: f64 = 120.0;

pub const MIN_VALUE: u32 = 50;
pub const MAX_VALUE: u32 = 90;

/// One linear-congruential step, `s * 1664525 + 1013904223 mod 2^32`.
pub fn lcg(s: u32) -> u32 {
    s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

fn clamp(v: f64) -> u32 {
    let floored = v.floor();
    if floored <= MIN_VALUE as f64 {
        MIN_VALUE
    } else if floored >= MAX_VALUE as f64 {
        MAX_VALUE
    } else {
        floored as u32
    }
}

/// Activity percentage on a slow sawtooth, 0..=99.
pub fn activity_at(now_ms: i64) -> u32 {
    let secs = now_ms as f64 / 1000.0;
    let phase = secs.rem_euclid(ACTIVITY_CYCLE_SECS) / ACTIVITY_CYCLE_SECS;
    (phase * 100.0).floor() as u32
}

/// A bucketed window of ambient values starting at `now_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientSignal {
    pub activity: u32,
    pub breath_values: Vec<u32>,
    pub intensity_values: Vec<u32>,
}

impl AmbientSignal {
    pub fn generate(seed: u32, now_ms: i64) -> Self {
        let activity = activity_at(now_ms);
        let base_step = now_ms.div_euclid(STEP_MS) as u64;
        let origin = (seed as u64).wrapping_add(base_step);

        // Offsets past the bucket index decorrelate the four draws per bucket.
        let draw = |i: usize, offset: u64| -> u32 {
            let s = origin.wrapping_add(i as u64).wrapping_add(offset) as u32;
            lcg(s)
        };

        let mut breath_values = Vec::with_capacity(BUCKET_COUNT);
        let mut intensity_values = Vec::with_capacity(BUCKET_COUNT);
        for i in 0..BUCKET_COUNT {
            let b_rand = (draw(i, 0) % 41) as f64;
            let b_jitter = (draw(i, 1) % 11) as f64 - 5.0;
            breath_values.push(clamp(50.0 + b_rand + b_jitter));

            let i_rand = (draw(i, 2) % 41) as f64;
            let i_jitter = (draw(i, 3) % 11) as f64 - 5.0;
            let value = 50.0 + (activity as f64 / 100.0) * 20.0 + i_rand / 2.0 + i_jitter;
            intensity_values.push(clamp(value));
        }

        Self {
            activity,
            breath_values,
            intensity_values,
        }
    }

    /// Value for the current bucket.
    pub fn breath(&self) -> u32 {
        self.breath_values.first().copied().unwrap_or(MIN_VALUE)
    }

    pub fn intensity(&self) -> u32 {
        self.intensity_values.first().copied().unwrap_or(MIN_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_matches_reference_steps() {
        assert_eq!(lcg(0), 1_013_904_223);
        assert_eq!(lcg(1), 1_015_568_748);
        // Wraps modulo 2^32 rather than overflowing.
        assert_eq!(lcg(u32::MAX), 1_012_239_698);
    }

    #[test]
    fn identical_inputs_give_identical_sequences() {
        let a = AmbientSignal::generate(123_456, 1_700_000_000_000);
        let b = AmbientSignal::generate(123_456, 1_700_000_000_000);
        assert_eq!(a, b);
        assert_eq!(a.breath_values.len(), BUCKET_COUNT);
        assert_eq!(a.intensity_values.len(), BUCKET_COUNT);
    }

    #[test]
    fn every_value_stays_within_bounds() {
        for seed in [0, 1, 42, 2_147_483_646, u32::MAX] {
            for now in [0_i64, 99, 1_700_000_000_000, 1_700_000_123_456, -5_000] {
                let signal = AmbientSignal::generate(seed, now);
                for v in signal.breath_values.iter().chain(signal.intensity_values.iter()) {
                    assert!((MIN_VALUE..=MAX_VALUE).contains(v), "{v} out of range");
                }
            }
        }
    }

    #[test]
    fn same_bucket_window_within_one_step() {
        // 1_700_000_000_000 is a multiple of STEP_MS, so +99ms stays in the same step.
        let a = AmbientSignal::generate(7, 1_700_000_000_000);
        let b = AmbientSignal::generate(7, 1_700_000_000_099);
        assert_eq!(a.breath_values, b.breath_values);
    }

    #[test]
    fn next_step_shifts_the_window_by_one_bucket() {
        let a = AmbientSignal::generate(7, 1_700_000_000_000);
        let b = AmbientSignal::generate(7, 1_700_000_000_000 + STEP_MS);
        assert_eq!(a.breath_values[1..], b.breath_values[..BUCKET_COUNT - 1]);
    }

    #[test]
    fn activity_is_a_sawtooth() {
        assert_eq!(activity_at(0), 0);
        assert_eq!(activity_at(60_000), 50);
        assert_eq!(activity_at(119_999), 99);
        assert_eq!(activity_at(120_000), 0);
    }

    #[test]
    fn current_values_are_the_first_bucket() {
        let signal = AmbientSignal::generate(99, 1_234_567);
        assert_eq!(signal.breath(), signal.breath_values[0]);
        assert_eq!(signal.intensity(), signal.intensity_values[0]);
    }
}
