use kiro_time::{LoopTiming, Superclock};

use crate::event::{Event, EventKey};
use crate::pool::EventPool;

/// Events of one loop cycle kept in play order.
///
/// The set only stores keys, the events themselves live in the [`EventPool`].
/// Storage is reserved up front and inserting shifts the tail in place.
#[derive(Debug)]
pub struct LoopEventSet {
  keys: Vec<EventKey>,
  capacity: usize,
}

impl LoopEventSet {
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

  /// Returns the position where the event was inserted, or gives the key back when full.
  pub fn insert(&mut self, key: EventKey, pool: &EventPool) -> Result<usize, EventKey> {
    if self.keys.len() >= self.capacity || self.keys.contains(&key) {
      return Err(key);
    }
    let event = pool.get(key);
    let index = self
      .keys
      .partition_point(|other| pool.get(*other).play_order(event).is_lt());
    self.keys.insert(index, key);
    Ok(index)
  }

  pub fn iter<'a>(&'a self, pool: &'a EventPool) -> impl Iterator<Item = &'a Event> + 'a {
    self.keys.iter().map(move |key| pool.get(*key))
  }

  /// Events with `start <= time < end`, in play order.
  pub fn range<'a>(
    &'a self,
    pool: &'a EventPool,
    start: Superclock,
    end: Superclock,
  ) -> impl Iterator<Item = &'a Event> + 'a {
    let first = self
      .keys
      .partition_point(|key| pool.get(*key).time < start);
    self.keys[first..]
      .iter()
      .map(move |key| pool.get(*key))
      .take_while(move |event| event.time < end)
  }

  /// Scales every stored time by `ratio`. Rounding may make times collide, so the
  /// play order is restored afterwards.
  pub fn rescale(&mut self, pool: &mut EventPool, timing: &LoopTiming, ratio: f64) {
    for key in self.keys.iter() {
      let event = pool.get_mut(*key);
      event.time = timing.rescale(event.time, ratio);
    }
    let pool = &*pool;
    self
      .keys
      .sort_unstable_by(|a, b| pool.get(*a).play_order(pool.get(*b)));
  }

  /// Gives every event back to the pool.
  pub fn release_all(&mut self, pool: &mut EventPool) {
    for key in self.keys.drain(..) {
      pool.release(key).ok();
    }
  }
}
