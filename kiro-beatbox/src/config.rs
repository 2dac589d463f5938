use crate::error::Result;
use crate::state::BeatboxState;

#[derive(Debug, Clone)]
pub struct BeatboxConfig {
  pub pool_capacity: usize,
  pub diagnostics_capacity: usize,
  pub resolve_notes_on_stop: bool,
  pub tempo: f32,
  pub meter_beats: u32,
  pub meter_beat_type: u32,
  pub measures: u32,
  pub quantize_divisor: u32,
}

impl BeatboxConfig {
  const DEFAULT_POOL_CAPACITY: usize = 1024;
  const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;
  const DEFAULT_TEMPO: f32 = 120.0;
  const DEFAULT_METER_BEATS: u32 = 4;
  const DEFAULT_METER_BEAT_TYPE: u32 = 4;
  const DEFAULT_MEASURES: u32 = 2;
  const DEFAULT_QUANTIZE_DIVISOR: u32 = 4;

  /// Takes the musical settings from a persisted state.
  pub fn with_state(mut self, state: &BeatboxState) -> Result<Self> {
    state.validate()?;
    self.tempo = state.tempo;
    self.meter_beats = state.meter_beats;
    self.meter_beat_type = state.meter_beat_type;
    self.measures = state.measures;
    self.quantize_divisor = state.quantize_divisor;
    Ok(self)
  }
}

impl Default for BeatboxConfig {
  fn default() -> Self {
    Self {
      pool_capacity: Self::DEFAULT_POOL_CAPACITY,
      diagnostics_capacity: Self::DEFAULT_DIAGNOSTICS_CAPACITY,
      resolve_notes_on_stop: false,
      tempo: Self::DEFAULT_TEMPO,
      meter_beats: Self::DEFAULT_METER_BEATS,
      meter_beat_type: Self::DEFAULT_METER_BEAT_TYPE,
      measures: Self::DEFAULT_MEASURES,
      quantize_divisor: Self::DEFAULT_QUANTIZE_DIVISOR,
    }
  }
}
