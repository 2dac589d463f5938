mod error;
mod superclock;
mod tempo;
mod timing;

pub use crate::error::{Result, TimeError};
pub use crate::superclock::{
  samples_to_superclock, superclock_to_samples, SampleRate, Samples, Superclock,
  SUPERCLOCK_TICKS_PER_SECOND,
};
pub use crate::tempo::{Signature, Tempo};
pub use crate::timing::LoopTiming;
