use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ringbuf::{Consumer, Producer, RingBuffer};
use thiserror::Error;

/// Something the processor could not do while rendering.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
  #[error("Ignored MIDI message of {size} bytes")]
  OversizedMessage { size: usize },

  #[error("No more events available, the input has been dropped")]
  PoolExhausted,

  #[error("Note off for {note} on channel {channel} without a corresponding note on")]
  DanglingNoteOff { channel: u8, note: u8 },

  #[error("The MIDI output buffer is full")]
  OutputOverflow,
}

pub fn channel(capacity: usize) -> (DiagnosticsSender, DiagnosticsReceiver) {
  let (producer, consumer) = RingBuffer::new(capacity).split();
  let dropped = Arc::new(AtomicUsize::new(0));
  let sender = DiagnosticsSender {
    producer,
    dropped: dropped.clone(),
  };
  let receiver = DiagnosticsReceiver { consumer, dropped };
  (sender, receiver)
}

/// Real-time side, never blocks.
pub struct DiagnosticsSender {
  producer: Producer<Diagnostic>,
  dropped: Arc<AtomicUsize>,
}

impl DiagnosticsSender {
  pub fn report(&mut self, diagnostic: Diagnostic) {
    if self.producer.push(diagnostic).is_err() {
      self.dropped.fetch_add(1, Ordering::Relaxed);
    }
  }
}

pub struct DiagnosticsReceiver {
  consumer: Consumer<Diagnostic>,
  dropped: Arc<AtomicUsize>,
}

impl DiagnosticsReceiver {
  pub fn pop(&mut self) -> Option<Diagnostic> {
    self.consumer.pop()
  }

  /// Diagnostics lost because nobody was draining them.
  pub fn dropped(&self) -> usize {
    self.dropped.load(Ordering::Relaxed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn report_and_pop() {
    let (mut sender, mut receiver) = channel(4);
    sender.report(Diagnostic::PoolExhausted);
    sender.report(Diagnostic::OversizedMessage { size: 30 });

    assert_eq!(receiver.pop(), Some(Diagnostic::PoolExhausted));
    assert_eq!(
      receiver.pop(),
      Some(Diagnostic::OversizedMessage { size: 30 })
    );
    assert_eq!(receiver.pop(), None);
    assert_eq!(receiver.dropped(), 0);
  }

  #[test]
  fn full_ring_counts_drops() {
    let (mut sender, mut receiver) = channel(1);
    sender.report(Diagnostic::PoolExhausted);
    sender.report(Diagnostic::OutputOverflow);
    sender.report(Diagnostic::OutputOverflow);

    assert_eq!(receiver.dropped(), 2);
    assert_eq!(receiver.pop(), Some(Diagnostic::PoolExhausted));
    assert_eq!(receiver.pop(), None);
  }

  #[test]
  fn display() {
    let diagnostic = Diagnostic::DanglingNoteOff {
      channel: 2,
      note: 60,
    };
    assert_eq!(
      diagnostic.to_string(),
      "Note off for 60 on channel 2 without a corresponding note on"
    );
  }
}
