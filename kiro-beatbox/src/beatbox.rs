use std::sync::Arc;

use kiro_time::{LoopTiming, Signature, Tempo};
use log::debug;

use crate::config::BeatboxConfig;
use crate::control::{BeatboxController, Control};
use crate::diagnostics;
use crate::error::{BeatboxError, Result};
use crate::state::BeatboxState;
use crate::transport::BeatboxProcessor;

pub struct Beatbox {
  controller: BeatboxController,
  processor: BeatboxProcessor,
}

impl Beatbox {
  pub fn new() -> Result<Self> {
    Self::with_config(BeatboxConfig::default())
  }

  pub fn from_state(state: &BeatboxState) -> Result<Self> {
    Self::with_config(BeatboxConfig::default().with_state(state)?)
  }

  pub fn with_config(config: BeatboxConfig) -> Result<Self> {
    if config.pool_capacity == 0 {
      return Err(BeatboxError::EmptyPool);
    }

    let tempo = Tempo::new(config.tempo)?;
    let signature = Signature::new(config.meter_beats, config.meter_beat_type)?;
    let timing = LoopTiming::new(tempo, signature, config.measures)?;
    debug!(
      "New beatbox: {} {} x {} measures, {} events",
      tempo, signature, config.measures, config.pool_capacity
    );

    let control = Arc::new(Control::new(config.quantize_divisor));
    let (diagnostics_tx, diagnostics_rx) = diagnostics::channel(config.diagnostics_capacity.max(1));
    let controller = BeatboxController::new(
      control.clone(),
      diagnostics_rx,
      &config,
      tempo,
      signature,
    );
    let processor = BeatboxProcessor::new(
      control,
      diagnostics_tx,
      timing,
      config.pool_capacity,
      config.resolve_notes_on_stop,
    );

    Ok(Self {
      controller,
      processor,
    })
  }

  pub fn split(self) -> (BeatboxController, BeatboxProcessor) {
    let Self {
      controller,
      processor,
    } = self;
    (controller, processor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use kiro_time::{TimeError, SUPERCLOCK_TICKS_PER_SECOND};

  #[test]
  fn default_beatbox() {
    let (controller, processor) = Beatbox::new().unwrap().split();
    assert!(!controller.is_running());
    assert_eq!(controller.state(), BeatboxState::default());
    assert_eq!(processor.free_slots(), 1024);
    assert_eq!(
      processor.timing().loop_length(),
      4 * SUPERCLOCK_TICKS_PER_SECOND
    );
  }

  #[test]
  fn invalid_configurations() {
    let result = Beatbox::with_config(BeatboxConfig {
      pool_capacity: 0,
      ..BeatboxConfig::default()
    });
    assert!(matches!(result, Err(BeatboxError::EmptyPool)));

    let result = Beatbox::with_config(BeatboxConfig {
      meter_beat_type: 0,
      ..BeatboxConfig::default()
    });
    assert!(matches!(
      result,
      Err(BeatboxError::Time(TimeError::InvalidSignature { .. }))
    ));

    let result = Beatbox::with_config(BeatboxConfig {
      measures: 0,
      ..BeatboxConfig::default()
    });
    assert!(matches!(
      result,
      Err(BeatboxError::Time(TimeError::NoMeasures))
    ));
  }

  #[test]
  fn invalid_tempo_requests() {
    let (mut controller, _processor) = Beatbox::new().unwrap().split();
    assert!(controller.set_tempo(0.0).is_err());
    assert!(controller.set_tempo(-10.0).is_err());
    assert!(controller.set_tempo(f32::NAN).is_err());
    assert!(controller.set_tempo(f32::INFINITY).is_err());
    assert_eq!(controller.tempo(), Tempo::default());
  }

  #[test]
  fn very_slow_and_very_fast_tempos() {
    let (mut controller, _processor) = Beatbox::new().unwrap().split();
    assert!(controller.set_tempo(0.5).is_ok());
    assert!(controller.set_tempo(1500.0).is_ok());
    assert_eq!(controller.state().tempo, 1500.0);

    let state = BeatboxState {
      tempo: 0.5,
      ..BeatboxState::default()
    };
    let (_controller, processor) = Beatbox::from_state(&state).unwrap().split();
    assert_eq!(
      processor.timing().loop_length(),
      960 * SUPERCLOCK_TICKS_PER_SECOND
    );
  }

  #[test]
  fn state_survives_a_reload() {
    let (mut controller, processor) = Beatbox::new().unwrap().split();
    controller.set_tempo(90.0).unwrap();
    controller.set_quantize(8);

    let json = controller.state().to_json().unwrap();
    let state = BeatboxState::from_json(&json).unwrap();
    assert_eq!(state.tempo, 90.0);
    assert_eq!(state.quantize_divisor, 8);

    let (reloaded, reloaded_processor) = Beatbox::from_state(&state).unwrap().split();
    assert_eq!(reloaded.state(), controller.state());
    assert_eq!(reloaded.quantize_divisor(), 8);
    assert_eq!(reloaded_processor.timing().tempo(), Tempo::new(90.0).unwrap());
    assert_eq!(
      reloaded_processor.timing().signature(),
      processor.timing().signature()
    );
  }

  #[test]
  fn state_with_custom_meter() {
    let state = BeatboxState {
      tempo: 60.0,
      meter_beats: 3,
      meter_beat_type: 8,
      measures: 4,
      quantize_divisor: 0,
      ..BeatboxState::default()
    };
    let (controller, processor) = Beatbox::from_state(&state).unwrap().split();
    assert_eq!(controller.state(), state);

    // eighth note beats at 60 bpm last one second
    let timing = processor.timing();
    assert_eq!(timing.beat(), SUPERCLOCK_TICKS_PER_SECOND);
    assert_eq!(timing.loop_length(), 12 * SUPERCLOCK_TICKS_PER_SECOND);
  }

  #[test]
  fn state_of_another_kind_is_rejected() {
    let state = BeatboxState {
      kind: "sampler".to_string(),
      ..BeatboxState::default()
    };
    assert!(matches!(
      Beatbox::from_state(&state),
      Err(BeatboxError::StateType(_))
    ));
  }
}
