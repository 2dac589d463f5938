//! Conversions between superclock ticks and audio samples.
//!
//! The superclock runs at a fixed rate that is an exact multiple of every common
//! sample rate (44.1k, 48k and their multiples), so those conversions never round.
//! Any other rate rounds to the nearest value, ties away from zero.

pub type Superclock = i64;
pub type Samples = i64;
pub type SampleRate = u32;

/// 2^10 * 3^4 * 5^3 * 7^2
pub const SUPERCLOCK_TICKS_PER_SECOND: Superclock = 508_032_000;

#[inline]
pub fn samples_to_superclock(samples: Samples, sample_rate: SampleRate) -> Superclock {
  if sample_rate == 0 {
    return 0;
  }
  let ticks = samples as i128 * SUPERCLOCK_TICKS_PER_SECOND as i128;
  div_round(ticks, sample_rate as i128) as Superclock
}

#[inline]
pub fn superclock_to_samples(superclock: Superclock, sample_rate: SampleRate) -> Samples {
  let samples = superclock as i128 * sample_rate as i128;
  div_round(samples, SUPERCLOCK_TICKS_PER_SECOND as i128) as Samples
}

fn div_round(num: i128, den: i128) -> i128 {
  let half = den / 2;
  if num >= 0 {
    (num + half) / den
  } else {
    (num - half) / den
  }
}
