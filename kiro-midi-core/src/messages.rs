//! Raw MIDI 1.0 byte messages.

pub const MAX_MESSAGE_SIZE: usize = 24;

/// Fixed capacity storage for the bytes of one message.
pub type MessageBytes = heapless::Vec<u8, MAX_MESSAGE_SIZE>;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const POLY_PRESSURE: u8 = 0xa0;
const CONTROL_CHANGE: u8 = 0xb0;
const PROGRAM_CHANGE: u8 = 0xc0;
const CHANNEL_PRESSURE: u8 = 0xd0;
const PITCH_BEND: u8 = 0xe0;

/// What a message is, as far as ordering and note pairing care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
  NoteOff { channel: u8, note: u8 },
  NoteOn { channel: u8, note: u8, velocity: u8 },
  PolyPressure { channel: u8, note: u8 },
  ControlChange { channel: u8 },
  ProgramChange { channel: u8 },
  ChannelPressure { channel: u8 },
  PitchBend { channel: u8 },
  System,
  Unknown,
}

impl MessageKind {
  /// A note on with zero velocity is reported as a note off.
  pub fn from_bytes(data: &[u8]) -> Self {
    let status = match data.first() {
      Some(status) if status & 0x80 != 0 => *status,
      _ => return MessageKind::Unknown,
    };

    if status >= 0xf0 {
      return MessageKind::System;
    }

    let channel = status & 0x0f;
    let data1 = data.get(1).map(|byte| byte & 0x7f);
    let data2 = data.get(2).map(|byte| byte & 0x7f);

    match (status & 0xf0, data1, data2) {
      (NOTE_OFF, Some(note), Some(_)) => MessageKind::NoteOff { channel, note },
      (NOTE_ON, Some(note), Some(0)) => MessageKind::NoteOff { channel, note },
      (NOTE_ON, Some(note), Some(velocity)) => MessageKind::NoteOn {
        channel,
        note,
        velocity,
      },
      (POLY_PRESSURE, Some(note), Some(_)) => MessageKind::PolyPressure { channel, note },
      (CONTROL_CHANGE, Some(_), Some(_)) => MessageKind::ControlChange { channel },
      (PROGRAM_CHANGE, Some(_), _) => MessageKind::ProgramChange { channel },
      (CHANNEL_PRESSURE, Some(_), _) => MessageKind::ChannelPressure { channel },
      (PITCH_BEND, Some(_), Some(_)) => MessageKind::PitchBend { channel },
      _ => MessageKind::Unknown,
    }
  }

  /// Ordering class for messages that happen at the same time. Lower goes first,
  /// so controllers are set up before notes, and a note ends before it restarts.
  pub fn priority(&self) -> u8 {
    match self {
      MessageKind::ControlChange { .. } => 0,
      MessageKind::ProgramChange { .. } => 1,
      MessageKind::NoteOff { .. } => 2,
      MessageKind::NoteOn { .. } => 3,
      MessageKind::PolyPressure { .. } => 4,
      MessageKind::ChannelPressure { .. } => 5,
      MessageKind::PitchBend { .. } => 6,
      MessageKind::System | MessageKind::Unknown => 7,
    }
  }

  pub fn is_note_on(&self) -> bool {
    matches!(self, MessageKind::NoteOn { .. })
  }

  pub fn is_note_off(&self) -> bool {
    matches!(self, MessageKind::NoteOff { .. })
  }
}

pub fn note_on(channel: u8, note: u8, velocity: u8) -> MessageBytes {
  channel_message(NOTE_ON | (channel & 0x0f), note & 0x7f, velocity & 0x7f)
}

pub fn note_off(channel: u8, note: u8, velocity: u8) -> MessageBytes {
  channel_message(NOTE_OFF | (channel & 0x0f), note & 0x7f, velocity & 0x7f)
}

pub fn control_change(channel: u8, index: u8, value: u8) -> MessageBytes {
  channel_message(CONTROL_CHANGE | (channel & 0x0f), index & 0x7f, value & 0x7f)
}

fn channel_message(status: u8, data1: u8, data2: u8) -> MessageBytes {
  let mut bytes = MessageBytes::new();
  // three bytes always fit
  bytes.extend_from_slice(&[status, data1, data2]).ok();
  bytes
}
