use kiro_midi_core::MessageKind;
use kiro_time::Superclock;

use crate::diagnostics::Diagnostic;
use crate::pending::PendingNotes;
use crate::pool::EventPool;

/// Grid that recorded events snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
  Free,
  Unit(Superclock),
}

impl Grid {
  /// `divisor` is the number of grid steps per whole note, 0 disables snapping.
  pub fn new(whole_note: Superclock, divisor: u32) -> Self {
    if divisor == 0 {
      Grid::Free
    } else {
      Grid::Unit((whole_note / divisor as Superclock).max(1))
    }
  }

  /// Largest grid position not after `time`.
  pub fn snap(&self, time: Superclock) -> Superclock {
    match self {
      Grid::Free => time,
      Grid::Unit(unit) => time.div_euclid(*unit) * unit,
    }
  }
}

pub struct Quantizer {
  grid: Grid,
  loop_length: Superclock,
}

impl Quantizer {
  pub fn new(grid: Grid, loop_length: Superclock) -> Self {
    Self { grid, loop_length }
  }

  /// Finds the position inside the loop for a message that arrived at `time`.
  ///
  /// Note offs are placed one grid step after the note on they close (the first
  /// pending one for the same channel and note). When a step is as long as the
  /// loop, the note off goes right before the note on comes back. A note off
  /// without a pending note on is rejected when snapping, and accepted as is otherwise.
  pub fn quantize(
    &self,
    kind: MessageKind,
    time: Superclock,
    pending: &mut PendingNotes,
    pool: &EventPool,
  ) -> Result<Superclock, Diagnostic> {
    match (kind, self.grid) {
      (MessageKind::NoteOff { channel, note }, Grid::Unit(unit)) => {
        match pending.take_matching(channel, note, pool) {
          Some(note_on) => Ok(self.note_off_time(pool.get(note_on).time, unit)),
          None => Err(Diagnostic::DanglingNoteOff { channel, note }),
        }
      }
      (MessageKind::NoteOff { channel, note }, Grid::Free) => {
        pending.take_matching(channel, note, pool);
        Ok(time)
      }
      (_, grid) => Ok(grid.snap(time)),
    }
  }

  fn note_off_time(&self, note_on: Superclock, unit: Superclock) -> Superclock {
    if unit < self.loop_length {
      (note_on + unit).rem_euclid(self.loop_length)
    } else {
      (note_on - 1).rem_euclid(self.loop_length)
    }
  }
}
