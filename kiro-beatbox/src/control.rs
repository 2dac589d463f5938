use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use kiro_time::{Signature, Tempo};
use log::{debug, info, warn};

use crate::config::BeatboxConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsReceiver};
use crate::error::Result;
use crate::state::{BeatboxState, STATE_TYPE};

const NO_TEMPO_REQUEST: u32 = 0;

/// Flags shared between the controller and the processor.
///
/// The processor reads them once per block, so relaxed ordering is all it needs.
#[derive(Debug)]
pub(crate) struct Control {
  start_requested: AtomicBool,
  running: AtomicBool,
  clear_requested: AtomicBool,
  tempo_request: AtomicU32,
  quantize_divisor: AtomicU32,
}

impl Control {
  pub fn new(quantize_divisor: u32) -> Self {
    Self {
      start_requested: AtomicBool::new(false),
      running: AtomicBool::new(false),
      clear_requested: AtomicBool::new(false),
      tempo_request: AtomicU32::new(NO_TEMPO_REQUEST),
      quantize_divisor: AtomicU32::new(quantize_divisor),
    }
  }

  pub fn start_requested(&self) -> bool {
    self.start_requested.load(Ordering::Relaxed)
  }

  pub fn set_running(&self, running: bool) {
    self.running.store(running, Ordering::Relaxed)
  }

  pub fn take_clear_request(&self) -> bool {
    self.clear_requested.swap(false, Ordering::Relaxed)
  }

  /// The last tempo requested since the previous call, if any.
  pub fn take_tempo_request(&self) -> Option<f32> {
    match self.tempo_request.swap(NO_TEMPO_REQUEST, Ordering::Relaxed) {
      NO_TEMPO_REQUEST => None,
      bits => Some(f32::from_bits(bits)),
    }
  }

  pub fn quantize_divisor(&self) -> u32 {
    self.quantize_divisor.load(Ordering::Relaxed)
  }
}

/// Non real-time side of a beatbox.
pub struct BeatboxController {
  control: Arc<Control>,
  diagnostics: DiagnosticsReceiver,
  reported_drops: usize,
  tempo: Tempo,
  signature: Signature,
  measures: u32,
}

impl BeatboxController {
  pub(crate) fn new(
    control: Arc<Control>,
    diagnostics: DiagnosticsReceiver,
    config: &BeatboxConfig,
    tempo: Tempo,
    signature: Signature,
  ) -> Self {
    Self {
      control,
      diagnostics,
      reported_drops: 0,
      tempo,
      signature,
      measures: config.measures,
    }
  }

  /// Playback starts from the loop beginning at the next block.
  pub fn start(&mut self) {
    info!("Starting the beatbox");
    self.control.start_requested.store(true, Ordering::Relaxed);
  }

  /// Recorded events are kept.
  pub fn stop(&mut self) {
    info!("Stopping the beatbox");
    self.control.start_requested.store(false, Ordering::Relaxed);
  }

  /// Whether the processor was running at its last block.
  pub fn is_running(&self) -> bool {
    self.control.running.load(Ordering::Relaxed)
  }

  pub fn tempo(&self) -> Tempo {
    self.tempo
  }

  /// Recorded events are moved so they keep their musical position.
  pub fn set_tempo(&mut self, bpm: f32) -> Result<()> {
    let tempo = Tempo::new(bpm)?;
    debug!("Tempo change requested: {} -> {}", self.tempo, tempo);
    self.tempo = tempo;
    self
      .control
      .tempo_request
      .store(tempo.bpm().to_bits(), Ordering::Relaxed);
    Ok(())
  }

  pub fn quantize_divisor(&self) -> u32 {
    self.control.quantize_divisor()
  }

  /// Number of grid steps per whole note for the next recorded events, 0 disables it.
  pub fn set_quantize(&mut self, divisor: u32) {
    debug!("Quantize divisor: {}", divisor);
    self
      .control
      .quantize_divisor
      .store(divisor, Ordering::Relaxed);
  }

  /// Forgets every recorded event at the next block.
  pub fn clear(&mut self) {
    info!("Clearing the loop");
    self.control.clear_requested.store(true, Ordering::Relaxed);
  }

  pub fn state(&self) -> BeatboxState {
    BeatboxState {
      kind: STATE_TYPE.to_string(),
      tempo: self.tempo.bpm(),
      meter_beats: self.signature.beats(),
      meter_beat_type: self.signature.beat_type(),
      measures: self.measures,
      quantize_divisor: self.quantize_divisor(),
    }
  }

  /// Hands every pending diagnostic to `f` and returns how many there were.
  pub fn poll_diagnostics<F>(&mut self, mut f: F) -> usize
  where
    F: FnMut(Diagnostic),
  {
    let mut count = 0;
    while let Some(diagnostic) = self.diagnostics.pop() {
      f(diagnostic);
      count += 1;
    }
    count
  }

  pub fn log_diagnostics(&mut self) {
    self.poll_diagnostics(|diagnostic| warn!("{}", diagnostic));

    let dropped = self.diagnostics.dropped();
    if dropped > self.reported_drops {
      warn!(
        "{} diagnostics were lost",
        dropped - self.reported_drops
      );
      self.reported_drops = dropped;
    }
  }

  pub fn dropped_diagnostics(&self) -> usize {
    self.diagnostics.dropped()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tempo_request_is_taken_once() {
    let control = Control::new(4);
    assert_eq!(control.take_tempo_request(), None);

    control
      .tempo_request
      .store(93.5_f32.to_bits(), Ordering::Relaxed);
    assert_eq!(control.take_tempo_request(), Some(93.5));
    assert_eq!(control.take_tempo_request(), None);
  }

  #[test]
  fn clear_request_is_taken_once() {
    let control = Control::new(4);
    control.clear_requested.store(true, Ordering::Relaxed);
    assert!(control.take_clear_request());
    assert!(!control.take_clear_request());
  }
}
