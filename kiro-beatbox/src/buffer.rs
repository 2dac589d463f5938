use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BufferError {
  #[error("The MIDI buffer is full")]
  Full,
}

/// One MIDI message inside a block, `offset` samples after the block start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEvent<'a> {
  pub offset: usize,
  pub data: &'a [u8],
}

#[derive(Debug, Clone, Copy)]
struct Slot {
  offset: usize,
  start: usize,
  len: usize,
}

/// Block of MIDI messages exchanged with the host.
///
/// Both the message list and the bytes are reserved up front, so pushing never
/// allocates; it fails when either of them is full.
#[derive(Debug)]
pub struct MidiBuffer {
  slots: Vec<Slot>,
  bytes: Vec<u8>,
  max_events: usize,
  max_bytes: usize,
}

impl MidiBuffer {
  pub const DEFAULT_BYTES_PER_EVENT: usize = 4;

  pub fn with_capacity(max_events: usize) -> Self {
    Self::with_capacity_and_bytes(max_events, max_events * Self::DEFAULT_BYTES_PER_EVENT)
  }

  pub fn with_capacity_and_bytes(max_events: usize, max_bytes: usize) -> Self {
    Self {
      slots: Vec::with_capacity(max_events),
      bytes: Vec::with_capacity(max_bytes),
      max_events,
      max_bytes,
    }
  }

  pub fn capacity(&self) -> usize {
    self.max_events
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn clear(&mut self) {
    self.slots.clear();
    self.bytes.clear();
  }

  pub fn push(&mut self, offset: usize, data: &[u8]) -> Result<(), BufferError> {
    if self.slots.len() >= self.max_events || self.bytes.len() + data.len() > self.max_bytes {
      return Err(BufferError::Full);
    }

    let start = self.bytes.len();
    self.bytes.extend_from_slice(data);
    self.slots.push(Slot {
      offset,
      start,
      len: data.len(),
    });
    Ok(())
  }

  pub fn iter(&self) -> Iter<'_> {
    Iter {
      buffer: self,
      slots: self.slots.iter(),
    }
  }

  fn event(&self, slot: &Slot) -> MidiEvent<'_> {
    MidiEvent {
      offset: slot.offset,
      data: &self.bytes[slot.start..slot.start + slot.len],
    }
  }
}

pub struct Iter<'a> {
  buffer: &'a MidiBuffer,
  slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
  type Item = MidiEvent<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    let buffer = self.buffer;
    self.slots.next().map(|slot| buffer.event(slot))
  }
}
