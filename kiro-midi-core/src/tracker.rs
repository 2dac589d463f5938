use crate::messages::{note_off, MessageBytes, MessageKind};

const CHANNELS: usize = 16;
const NOTES: usize = 128;

/// Counts the note ons that have not been followed by a note off yet,
/// so hanging notes can be released when playback stops.
pub struct NoteTracker {
  active: [[u8; NOTES]; CHANNELS],
  len: usize,
}

impl NoteTracker {
  pub fn new() -> Self {
    Self {
      active: [[0; NOTES]; CHANNELS],
      len: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn is_active(&self, channel: u8, note: u8) -> bool {
    self.active[(channel & 0x0f) as usize][(note & 0x7f) as usize] > 0
  }

  pub fn track(&mut self, data: &[u8]) {
    match MessageKind::from_bytes(data) {
      MessageKind::NoteOn { channel, note, .. } => {
        let count = &mut self.active[channel as usize][note as usize];
        if *count < u8::MAX {
          *count += 1;
          self.len += 1;
        }
      }
      MessageKind::NoteOff { channel, note } => {
        let count = &mut self.active[channel as usize][note as usize];
        if *count > 0 {
          *count -= 1;
          self.len -= 1;
        }
      }
      _ => {}
    }
  }

  /// Calls `emit` with one note off for every pending note on and forgets them.
  pub fn resolve<F>(&mut self, mut emit: F)
  where
    F: FnMut(MessageBytes),
  {
    if self.len == 0 {
      return;
    }
    for (channel, notes) in self.active.iter_mut().enumerate() {
      for (note, count) in notes.iter_mut().enumerate() {
        while *count > 0 {
          emit(note_off(channel as u8, note as u8, 0));
          *count -= 1;
        }
      }
    }
    self.len = 0;
  }

  pub fn reset(&mut self) {
    self.active = [[0; NOTES]; CHANNELS];
    self.len = 0;
  }
}

impl Default for NoteTracker {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::messages::note_on;

  #[test]
  fn track_note_on_and_off() {
    let mut tracker = NoteTracker::new();
    tracker.track(&note_on(1, 60, 100));
    tracker.track(&note_on(1, 60, 90));
    tracker.track(&note_on(2, 64, 90));
    assert_eq!(tracker.len(), 3);
    assert!(tracker.is_active(1, 60));

    tracker.track(&note_off(1, 60, 0));
    assert!(tracker.is_active(1, 60));
    tracker.track(&note_off(1, 60, 0));
    assert!(!tracker.is_active(1, 60));
    assert_eq!(tracker.len(), 1);
  }

  #[test]
  fn unmatched_note_off_is_ignored() {
    let mut tracker = NoteTracker::new();
    tracker.track(&note_off(0, 60, 0));
    assert!(tracker.is_empty());
  }

  #[test]
  fn resolve_emits_note_offs() {
    let mut tracker = NoteTracker::new();
    tracker.track(&note_on(0, 60, 100));
    tracker.track(&note_on(0, 60, 100));
    tracker.track(&note_on(9, 36, 100));

    let mut released = Vec::new();
    tracker.resolve(|bytes| released.push(bytes));

    assert_eq!(
      released,
      vec![note_off(0, 60, 0), note_off(0, 60, 0), note_off(9, 36, 0)]
    );
    assert!(tracker.is_empty());
    assert!(!tracker.is_active(9, 36));
  }

  #[test]
  fn reset_forgets_everything() {
    let mut tracker = NoteTracker::new();
    tracker.track(&note_on(0, 60, 100));
    tracker.reset();
    assert!(tracker.is_empty());
    let mut released = 0;
    tracker.resolve(|_| released += 1);
    assert_eq!(released, 0);
  }
}
