use std::cmp::Ordering;

use kiro_midi_core::{MessageBytes, MessageKind};
use kiro_time::Superclock;

/// Stable handle to an event slot of an [`EventPool`](crate::pool::EventPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey(u32);

impl EventKey {
  pub(crate) fn new(index: usize) -> Self {
    Self(index as u32)
  }

  pub fn index(&self) -> usize {
    self.0 as usize
  }
}

/// A recorded MIDI message positioned inside the loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
  /// Offset from the loop start
  pub time: Superclock,
  /// Whole note length when the event was recorded
  pub whole_note: Superclock,
  pub(crate) seq: u64,
  pub data: MessageBytes,
}

impl Event {
  pub fn size(&self) -> usize {
    self.data.len()
  }

  pub fn kind(&self) -> MessageKind {
    MessageKind::from_bytes(&self.data)
  }

  pub fn seq(&self) -> u64 {
    self.seq
  }

  /// Playback order: time, then the simultaneous message priority, then insertion order.
  pub fn play_order(&self, other: &Event) -> Ordering {
    self
      .time
      .cmp(&other.time)
      .then_with(|| self.kind().priority().cmp(&other.kind().priority()))
      .then_with(|| self.seq.cmp(&other.seq))
  }
}
