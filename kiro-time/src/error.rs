use thiserror::Error;

pub type Result<T> = core::result::Result<T, TimeError>;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TimeError {
  #[error("Invalid tempo: {0} bpm")]
  InvalidTempo(f32),

  #[error("Invalid signature {beats}/{beat_type}")]
  InvalidSignature { beats: u32, beat_type: u32 },

  #[error("A loop needs at least one measure")]
  NoMeasures,
}
