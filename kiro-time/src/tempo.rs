use std::fmt::{Display, Formatter};

use crate::error::{Result, TimeError};

/// Beats per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tempo(f32);

impl Tempo {
  pub const DEFAULT_BPM: f32 = 120.0;

  /// Any finite and positive number of beats per minute.
  pub fn new(bpm: f32) -> Result<Self> {
    if bpm.is_finite() && bpm > 0.0 {
      Ok(Self(bpm))
    } else {
      Err(TimeError::InvalidTempo(bpm))
    }
  }

  pub fn bpm(&self) -> f32 {
    self.0
  }
}

impl Default for Tempo {
  fn default() -> Self {
    Self(Self::DEFAULT_BPM)
  }
}

impl Display for Tempo {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} bpm", self.0)
  }
}

/// Time signature (meter): number of beats per measure and the note value of a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
  beats: u32,
  beat_type: u32,
}

impl Signature {
  pub fn new(beats: u32, beat_type: u32) -> Result<Self> {
    if beats > 0 && beat_type > 0 {
      Ok(Self { beats, beat_type })
    } else {
      Err(TimeError::InvalidSignature { beats, beat_type })
    }
  }

  pub fn beats(&self) -> u32 {
    self.beats
  }

  pub fn beat_type(&self) -> u32 {
    self.beat_type
  }
}

impl Default for Signature {
  fn default() -> Self {
    Self {
      beats: 4,
      beat_type: 4,
    }
  }
}

impl Display for Signature {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.beats, self.beat_type)
  }
}
