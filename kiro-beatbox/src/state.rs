use serde::{Deserialize, Serialize};

use crate::error::{BeatboxError, Result};

pub const STATE_TYPE: &str = "beatbox";

/// Persisted settings of a beatbox, the recorded events are not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatboxState {
  #[serde(rename = "type")]
  pub kind: String,
  pub tempo: f32,
  pub meter_beats: u32,
  pub meter_beat_type: u32,
  pub measures: u32,
  pub quantize_divisor: u32,
}

impl BeatboxState {
  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn from_json(json: &str) -> Result<Self> {
    let state: Self = serde_json::from_str(json)?;
    state.validate()?;
    Ok(state)
  }

  pub fn validate(&self) -> Result<()> {
    if self.kind == STATE_TYPE {
      Ok(())
    } else {
      Err(BeatboxError::StateType(self.kind.clone()))
    }
  }
}

impl Default for BeatboxState {
  fn default() -> Self {
    Self {
      kind: STATE_TYPE.to_string(),
      tempo: 120.0,
      meter_beats: 4,
      meter_beat_type: 4,
      measures: 2,
      quantize_divisor: 4,
    }
  }
}
