use kiro_midi_core::MessageKind;

use crate::event::EventKey;
use crate::pool::EventPool;

/// Recorded note ons still waiting for their note off, in arrival order.
///
/// Entries point at events owned by the loop set, the list never owns them.
#[derive(Debug)]
pub struct PendingNotes {
  keys: Vec<EventKey>,
  capacity: usize,
}

impl PendingNotes {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      keys: Vec::with_capacity(capacity),
      capacity,
    }
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  pub fn push(&mut self, key: EventKey) -> Result<(), EventKey> {
    if self.keys.len() < self.capacity {
      self.keys.push(key);
      Ok(())
    } else {
      Err(key)
    }
  }

  /// Removes and returns the oldest note on for the same channel and note.
  pub fn take_matching(&mut self, channel: u8, note: u8, pool: &EventPool) -> Option<EventKey> {
    let index = self.keys.iter().position(|key| {
      matches!(
        pool.get(*key).kind(),
        MessageKind::NoteOn { channel: c, note: n, .. } if c == channel && n == note
      )
    })?;
    Some(self.keys.remove(index))
  }

  pub fn clear(&mut self) {
    self.keys.clear();
  }

  pub fn iter(&self) -> impl Iterator<Item = &EventKey> {
    self.keys.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use kiro_midi_core::messages::note_on;
  use kiro_time::Superclock;

  fn note(pool: &mut EventPool, time: Superclock, channel: u8, note: u8) -> EventKey {
    let key = pool.acquire().unwrap();
    let event = pool.get_mut(key);
    event.time = time;
    event.data = note_on(channel, note, 100);
    key
  }

  #[test]
  fn takes_the_first_match_in_arrival_order() {
    let mut pool = EventPool::new(3);
    let mut pending = PendingNotes::with_capacity(3);
    let late = note(&mut pool, 300, 0, 60);
    let other = note(&mut pool, 100, 0, 62);
    let early = note(&mut pool, 50, 0, 60);
    pending.push(late).unwrap();
    pending.push(other).unwrap();
    pending.push(early).unwrap();

    assert_eq!(pending.take_matching(0, 60, &pool), Some(late));
    assert_eq!(pending.take_matching(0, 60, &pool), Some(early));
    assert_eq!(pending.take_matching(0, 60, &pool), None);
    assert_eq!(pending.iter().copied().collect::<Vec<_>>(), vec![other]);
  }

  #[test]
  fn channel_must_match() {
    let mut pool = EventPool::new(1);
    let mut pending = PendingNotes::with_capacity(1);
    let key = note(&mut pool, 0, 3, 60);
    pending.push(key).unwrap();

    assert_eq!(pending.take_matching(4, 60, &pool), None);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.take_matching(3, 60, &pool), Some(key));
    assert!(pending.is_empty());
  }

  #[test]
  fn push_is_bounded() {
    let mut pool = EventPool::new(2);
    let mut pending = PendingNotes::with_capacity(1);
    let a = note(&mut pool, 0, 0, 60);
    let b = note(&mut pool, 0, 0, 61);
    assert_eq!(pending.push(a), Ok(()));
    assert_eq!(pending.push(b), Err(b));
  }
}
