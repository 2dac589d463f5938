use kiro_time::SampleRate;

use crate::buffer::MidiBuffer;

pub struct ProcessContext<'a> {
  num_samples: usize,
  sample_rate: SampleRate,
  midi_input: Option<&'a MidiBuffer>,
  midi_output: Option<&'a mut MidiBuffer>,
}

impl<'a> ProcessContext<'a> {
  pub fn new(
    num_samples: usize,
    sample_rate: SampleRate,
    midi_input: Option<&'a MidiBuffer>,
    midi_output: Option<&'a mut MidiBuffer>,
  ) -> Self {
    Self {
      num_samples,
      sample_rate,
      midi_input,
      midi_output,
    }
  }

  pub fn num_samples(&self) -> usize {
    self.num_samples
  }

  pub fn sample_rate(&self) -> SampleRate {
    self.sample_rate
  }

  /// Both MIDI buffers, only when the host provided them.
  pub fn midi_ports(&mut self) -> Option<(&'a MidiBuffer, &mut MidiBuffer)> {
    match (self.midi_input, self.midi_output.as_deref_mut()) {
      (Some(input), Some(output)) => Some((input, output)),
      _ => None,
    }
  }
}
