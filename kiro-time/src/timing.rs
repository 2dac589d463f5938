use crate::error::{Result, TimeError};
use crate::superclock::{Superclock, SUPERCLOCK_TICKS_PER_SECOND};
use crate::tempo::{Signature, Tempo};

/// Musical durations of a loop expressed in superclocks.
///
/// The derived durations are always recomputed together, so a reader never observes
/// a beat length from one tempo and a measure length from another.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopTiming {
  tempo: Tempo,
  signature: Signature,
  measures: u32,
  whole_note: Superclock,
  beat: Superclock,
  measure: Superclock,
  loop_length: Superclock,
}

impl LoopTiming {
  pub fn new(tempo: Tempo, signature: Signature, measures: u32) -> Result<Self> {
    if measures == 0 {
      return Err(TimeError::NoMeasures);
    }

    let mut timing = Self {
      tempo,
      signature,
      measures,
      whole_note: 0,
      beat: 0,
      measure: 0,
      loop_length: 0,
    };
    timing.recompute();
    Ok(timing)
  }

  pub fn tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn signature(&self) -> Signature {
    self.signature
  }

  pub fn measures(&self) -> u32 {
    self.measures
  }

  pub fn whole_note(&self) -> Superclock {
    self.whole_note
  }

  pub fn beat(&self) -> Superclock {
    self.beat
  }

  pub fn measure(&self) -> Superclock {
    self.measure
  }

  /// Always at least one tick long.
  pub fn loop_length(&self) -> Superclock {
    self.loop_length
  }

  /// Changes the tempo and returns the `old / new` ratio that stored times
  /// need to be scaled by to keep their musical position.
  pub fn set_tempo(&mut self, tempo: Tempo) -> f64 {
    let ratio = self.tempo.bpm() as f64 / tempo.bpm() as f64;
    self.tempo = tempo;
    self.recompute();
    ratio
  }

  /// Scales a time inside the loop by a tempo ratio, keeping it inside the loop.
  pub fn rescale(&self, time: Superclock, ratio: f64) -> Superclock {
    let scaled = (time as f64 * ratio).round() as Superclock;
    scaled.clamp(0, self.loop_length - 1)
  }

  fn recompute(&mut self) {
    let beat_type = self.signature.beat_type() as f64;
    let whole_notes_per_minute = self.tempo.bpm() as f64 / beat_type;
    let ticks_per_minute = (SUPERCLOCK_TICKS_PER_SECOND * 60) as f64;

    self.whole_note = (ticks_per_minute / whole_notes_per_minute).round() as Superclock;
    self.beat = (self.whole_note / self.signature.beat_type() as Superclock).max(1);
    self.measure = self
      .beat
      .saturating_mul(self.signature.beats() as Superclock);
    self.loop_length = self.measure.saturating_mul(self.measures as Superclock);
  }
}

impl Default for LoopTiming {
  fn default() -> Self {
    let mut timing = Self {
      tempo: Tempo::default(),
      signature: Signature::default(),
      measures: 2,
      whole_note: 0,
      beat: 0,
      measure: 0,
      loop_length: 0,
    };
    timing.recompute();
    timing
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use assert_approx_eq::assert_approx_eq;

  const SECOND: Superclock = SUPERCLOCK_TICKS_PER_SECOND;

  fn timing(bpm: f32, beats: u32, beat_type: u32, measures: u32) -> LoopTiming {
    LoopTiming::new(
      Tempo::new(bpm).unwrap(),
      Signature::new(beats, beat_type).unwrap(),
      measures,
    )
    .unwrap()
  }

  #[test]
  fn four_four_at_120() {
    let timing = timing(120.0, 4, 4, 2);
    assert_eq!(timing.whole_note(), 2 * SECOND);
    assert_eq!(timing.beat(), SECOND / 2);
    assert_eq!(timing.measure(), 2 * SECOND);
    assert_eq!(timing.loop_length(), 4 * SECOND);
  }

  #[test]
  fn default_is_two_measures_of_four_four_at_120() {
    assert_eq!(LoopTiming::default(), timing(120.0, 4, 4, 2));
  }

  #[test]
  fn six_eight() {
    // an eighth note beat at 120 bpm lasts half a second
    let timing = timing(120.0, 6, 8, 1);
    assert_eq!(timing.beat(), SECOND / 2);
    assert_eq!(timing.whole_note(), 4 * SECOND);
    assert_eq!(timing.loop_length(), 3 * SECOND);
  }

  #[test]
  fn no_measures() {
    let result = LoopTiming::new(Tempo::default(), Signature::default(), 0);
    assert_eq!(result, Err(TimeError::NoMeasures));
  }

  #[test]
  fn set_tempo_recomputes_and_returns_ratio() {
    let mut timing = timing(120.0, 4, 4, 2);
    let ratio = timing.set_tempo(Tempo::new(60.0).unwrap());
    assert_approx_eq!(ratio, 2.0);
    assert_eq!(timing.whole_note(), 4 * SECOND);
    assert_eq!(timing.loop_length(), 8 * SECOND);
  }

  #[test]
  fn three_four() {
    let timing = timing(120.0, 3, 4, 4);
    assert_eq!(timing.measure(), 3 * SECOND / 2);
    assert_eq!(timing.loop_length(), 6 * SECOND);
  }

  #[test]
  fn extreme_tempos() {
    // half a beat per minute
    let slow = timing(0.5, 4, 4, 1);
    assert_eq!(slow.whole_note(), 480 * SECOND);
    assert_eq!(slow.loop_length(), 480 * SECOND);

    let fast = timing(1500.0, 4, 4, 1);
    assert_eq!(fast.whole_note(), 4 * SECOND / 25);
    assert_eq!(fast.beat(), SECOND / 25);
  }

  #[test]
  fn set_tempo_with_an_uneven_ratio() {
    let mut timing = timing(120.0, 4, 4, 2);
    let ratio = timing.set_tempo(Tempo::new(90.0).unwrap());
    assert_approx_eq!(ratio, 4.0 / 3.0);
    assert_eq!(timing.rescale(1_000_001, ratio), 1_333_335);
  }

  #[test]
  fn rescale_keeps_times_inside_the_loop() {
    let mut timing = timing(120.0, 4, 4, 1);
    let ratio = timing.set_tempo(Tempo::new(240.0).unwrap());
    assert_eq!(timing.rescale(SECOND, ratio), SECOND / 2);
    assert_eq!(timing.rescale(3, ratio), 2);
    assert_eq!(
      timing.rescale(2 * SECOND - 1, ratio),
      timing.loop_length() - 1
    );
  }
}
