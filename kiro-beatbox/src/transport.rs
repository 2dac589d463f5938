use std::sync::Arc;

use kiro_midi_core::{MessageBytes, MessageKind, NoteTracker};
use kiro_time::{
  samples_to_superclock, superclock_to_samples, LoopTiming, SampleRate, Samples, Superclock,
  Tempo,
};

use crate::buffer::MidiBuffer;
use crate::control::Control;
use crate::diagnostics::{Diagnostic, DiagnosticsSender};
use crate::event::Event;
use crate::loop_set::LoopEventSet;
use crate::pending::PendingNotes;
use crate::pool::EventPool;
use crate::processor::{ProcessContext, Processor};
use crate::quantizer::{Grid, Quantizer};

/// Span of the loop rendered in one go, `offset` superclocks after the block start.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pass {
  start: Superclock,
  length: Superclock,
  offset: Superclock,
}

impl Pass {
  fn end(&self) -> Superclock {
    self.start + self.length
  }

  /// Splits a block starting at `position` in the loop where it crosses the loop end.
  fn split(
    position: Superclock,
    block: Superclock,
    loop_length: Superclock,
  ) -> (Pass, Option<Pass>) {
    let first = Pass {
      start: position,
      length: block.min(loop_length - position),
      offset: 0,
    };
    let remainder = block - first.length;
    let second = (remainder > 0).then(|| Pass {
      start: 0,
      length: remainder.min(loop_length),
      offset: first.length,
    });
    (first, second)
  }
}

struct Block {
  num_samples: usize,
  sample_rate: SampleRate,
  position: Superclock,
  loop_length: Superclock,
  quantizer: Quantizer,
}

/// Real-time side of a beatbox.
///
/// Every block it plays the recorded events that fall inside it and records the
/// incoming MIDI, quantized to the current grid. Nothing here blocks, allocates or logs.
pub struct BeatboxProcessor {
  control: Arc<Control>,
  diagnostics: DiagnosticsSender,
  timing: LoopTiming,
  pool: EventPool,
  events: LoopEventSet,
  pending: PendingNotes,
  tracker: NoteTracker,
  resolve_notes_on_stop: bool,
  running: bool,
  counter: Superclock,
  last_start: Superclock,
  next_seq: u64,
}

impl BeatboxProcessor {
  pub(crate) fn new(
    control: Arc<Control>,
    diagnostics: DiagnosticsSender,
    timing: LoopTiming,
    pool_capacity: usize,
    resolve_notes_on_stop: bool,
  ) -> Self {
    Self {
      control,
      diagnostics,
      timing,
      pool: EventPool::new(pool_capacity),
      events: LoopEventSet::with_capacity(pool_capacity),
      pending: PendingNotes::with_capacity(pool_capacity),
      tracker: NoteTracker::new(),
      resolve_notes_on_stop,
      running: false,
      counter: 0,
      last_start: 0,
      next_seq: 0,
    }
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  /// Superclocks rendered since the creation.
  pub fn counter(&self) -> Superclock {
    self.counter
  }

  pub fn timing(&self) -> &LoopTiming {
    &self.timing
  }

  pub fn event_count(&self) -> usize {
    self.events.len()
  }

  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  pub fn free_slots(&self) -> usize {
    self.pool.available()
  }

  /// Recorded events in play order.
  pub fn events(&self) -> impl Iterator<Item = &Event> {
    self.events.iter(&self.pool)
  }

  /// Lets the time pass without playing nor recording anything.
  pub fn silence(&mut self, num_samples: usize, sample_rate: SampleRate) {
    self.counter += samples_to_superclock(num_samples as Samples, sample_rate);
  }

  /// Blocks without both MIDI buffers are ignored altogether.
  pub fn process(&mut self, context: &mut ProcessContext) {
    let num_samples = context.num_samples();
    let sample_rate = context.sample_rate();
    let (input, output) = match context.midi_ports() {
      Some(ports) => ports,
      None => return,
    };

    self.update_transport(output);

    let block = samples_to_superclock(num_samples as Samples, sample_rate);

    self.apply_tempo_request();

    if self.control.take_clear_request() {
      self.clear_events();
    }

    if !self.running {
      self.counter += block;
      return;
    }

    let loop_length = self.timing.loop_length();
    debug_assert!(block <= loop_length, "The block is longer than the loop");

    let grid = Grid::new(self.timing.whole_note(), self.control.quantize_divisor());
    let position = (self.counter - self.last_start).rem_euclid(loop_length);
    let block_info = Block {
      num_samples,
      sample_rate,
      position,
      loop_length,
      quantizer: Quantizer::new(grid, loop_length),
    };

    let (first, second) = Pass::split(position, block, loop_length);
    self.render_pass(&first, second.is_none(), &block_info, input, output);
    if let Some(second) = second {
      self.render_pass(&second, true, &block_info, input, output);
    }

    self.counter += block;
  }

  fn update_transport(&mut self, output: &mut MidiBuffer) {
    let requested = self.control.start_requested();
    if requested == self.running {
      return;
    }

    self.running = requested;
    self.control.set_running(requested);

    if requested {
      self.last_start = self.counter;
    } else if self.resolve_notes_on_stop {
      let diagnostics = &mut self.diagnostics;
      self.tracker.resolve(|message| {
        if output.push(0, &message).is_err() {
          diagnostics.report(Diagnostic::OutputOverflow);
        }
      });
    } else {
      self.tracker.reset();
    }
  }

  fn apply_tempo_request(&mut self) {
    let tempo = match self
      .control
      .take_tempo_request()
      .and_then(|bpm| Tempo::new(bpm).ok())
    {
      Some(tempo) if tempo != self.timing.tempo() => tempo,
      _ => return,
    };

    let ratio = self.timing.set_tempo(tempo);
    self.events.rescale(&mut self.pool, &self.timing, ratio);
  }

  fn clear_events(&mut self) {
    self.pending.clear();
    self.events.release_all(&mut self.pool);
  }

  fn render_pass(
    &mut self,
    pass: &Pass,
    last: bool,
    block: &Block,
    input: &MidiBuffer,
    output: &mut MidiBuffer,
  ) {
    self.play(pass, block, output);
    self.record(pass, last, block, input);
  }

  fn play(&mut self, pass: &Pass, block: &Block, output: &mut MidiBuffer) {
    let last_sample = block.num_samples.saturating_sub(1);
    for event in self.events.range(&self.pool, pass.start, pass.end()) {
      let time = pass.offset + event.time - pass.start;
      let offset = superclock_to_samples(time, block.sample_rate).max(0) as usize;
      if output.push(offset.min(last_sample), &event.data).is_ok() {
        self.tracker.track(&event.data);
      } else {
        self.diagnostics.report(Diagnostic::OutputOverflow);
      }
    }
  }

  /// Records the input that belongs to the pass. The last pass also takes
  /// anything placed after the block end.
  fn record(&mut self, pass: &Pass, last: bool, block: &Block, input: &MidiBuffer) {
    let pass_end = pass.offset + pass.length;
    for midi_event in input.iter() {
      let offset = samples_to_superclock(midi_event.offset as Samples, block.sample_rate);
      if offset < pass.offset || (!last && offset >= pass_end) {
        continue;
      }
      let time = (block.position + offset).rem_euclid(block.loop_length);
      self.record_message(time, midi_event.data, &block.quantizer);
    }
  }

  fn record_message(&mut self, time: Superclock, data: &[u8], quantizer: &Quantizer) {
    let bytes = match MessageBytes::from_slice(data) {
      Ok(bytes) if !bytes.is_empty() => bytes,
      Ok(_) => return,
      Err(_) => {
        let size = data.len();
        self
          .diagnostics
          .report(Diagnostic::OversizedMessage { size });
        return;
      }
    };

    if self.pool.available() == 0 {
      self.diagnostics.report(Diagnostic::PoolExhausted);
      return;
    }

    let kind = MessageKind::from_bytes(&bytes);
    let time = match quantizer.quantize(kind, time, &mut self.pending, &self.pool) {
      Ok(time) => time,
      Err(diagnostic) => {
        self.diagnostics.report(diagnostic);
        return;
      }
    };

    let key = match self.pool.acquire() {
      Ok(key) => key,
      Err(_) => {
        self.diagnostics.report(Diagnostic::PoolExhausted);
        return;
      }
    };

    let event = self.pool.get_mut(key);
    event.time = time;
    event.whole_note = self.timing.whole_note();
    event.seq = self.next_seq;
    event.data = bytes;
    self.next_seq += 1;

    if let Err(key) = self.events.insert(key, &self.pool) {
      self.pool.release(key).ok();
      self.diagnostics.report(Diagnostic::PoolExhausted);
      return;
    }

    if kind.is_note_on() {
      self.pending.push(key).ok();
    }
  }
}

impl Processor for BeatboxProcessor {
  fn render(&mut self, context: &mut ProcessContext) {
    self.process(context)
  }
}
