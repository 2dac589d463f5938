use thiserror::Error;

use crate::event::{Event, EventKey};

#[derive(Error, Debug, PartialEq)]
pub enum PoolError {
  #[error("Out of events")]
  Exhausted,

  #[error("An event that is not in use has been released")]
  NotInUse,
}

pub type Result<T> = core::result::Result<T, PoolError>;

#[derive(Debug)]
struct Slot {
  next: Option<EventKey>,
  in_use: bool,
  event: Event,
}

/// Fixed arena of events with an intrusive free list.
///
/// All the slots are allocated up front, acquiring and releasing never touch the heap.
#[derive(Debug)]
pub struct EventPool {
  slots: Vec<Slot>,
  head: Option<EventKey>,
  available: usize,
}

impl EventPool {
  pub fn new(capacity: usize) -> Self {
    let mut slots = Vec::with_capacity(capacity);
    let mut head = None;
    for index in 0..capacity {
      slots.push(Slot {
        next: head.take(),
        in_use: false,
        event: Event::default(),
      });
      head = Some(EventKey::new(index));
    }
    Self {
      slots,
      head,
      available: capacity,
    }
  }

  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  pub fn available(&self) -> usize {
    self.available
  }

  pub fn in_use(&self) -> usize {
    self.capacity() - self.available
  }

  /// The returned event keeps whatever a previous owner left in it.
  pub fn acquire(&mut self) -> Result<EventKey> {
    let key = self.head.ok_or(PoolError::Exhausted)?;
    let slot = &mut self.slots[key.index()];
    self.head = slot.next.take();
    slot.in_use = true;
    self.available -= 1;
    Ok(key)
  }

  pub fn release(&mut self, key: EventKey) -> Result<()> {
    let slot = &mut self.slots[key.index()];
    if slot.in_use {
      slot.in_use = false;
      slot.next = self.head.replace(key);
      self.available += 1;
      Ok(())
    } else {
      Err(PoolError::NotInUse)
    }
  }

  #[inline]
  pub fn get(&self, key: EventKey) -> &Event {
    &self.slots[key.index()].event
  }

  #[inline]
  pub fn get_mut(&mut self, key: EventKey) -> &mut Event {
    &mut self.slots[key.index()].event
  }
}
