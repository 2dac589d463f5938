use anyhow::{Context, Result};
use log::info;

use kiro_beatbox::{Beatbox, BeatboxState, MidiBuffer, ProcessContext};
use kiro_midi_core::messages::{note_off, note_on};
use kiro_midi_core::MessageBytes;
use kiro_time::{superclock_to_samples, SampleRate};

const SAMPLE_RATE: SampleRate = 48_000;
const BLOCK_SIZE: usize = 512;
const CYCLES: usize = 3;

const KICK: u8 = 36;
const SNARE: u8 = 38;
const HIHAT: u8 = 42;

fn main() -> Result<()> {
  env_logger::init();

  let beatbox = match std::env::args().nth(1) {
    Some(path) => {
      let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read the state from {}", path))?;
      let state = BeatboxState::from_json(&json)?;
      Beatbox::from_state(&state)?
    }
    None => Beatbox::new()?,
  };

  let (mut controller, mut processor) = beatbox.split();
  info!("{}", controller.state().to_json()?);

  let loop_samples = superclock_to_samples(processor.timing().loop_length(), SAMPLE_RATE) as usize;
  let beat_samples = superclock_to_samples(processor.timing().beat(), SAMPLE_RATE) as usize;
  let pattern = pattern(beat_samples, loop_samples);

  let mut midi_input = MidiBuffer::with_capacity(256);
  let mut midi_output = MidiBuffer::with_capacity(256);

  controller.start();

  for block_start in (0..loop_samples * CYCLES).step_by(BLOCK_SIZE) {
    midi_input.clear();
    midi_output.clear();

    if block_start < loop_samples {
      for (position, message) in pattern.iter() {
        if (block_start..block_start + BLOCK_SIZE).contains(position) {
          midi_input.push(position - block_start, message)?;
        }
      }
    }

    let mut context = ProcessContext::new(
      BLOCK_SIZE,
      SAMPLE_RATE,
      Some(&midi_input),
      Some(&mut midi_output),
    );
    processor.process(&mut context);

    for event in midi_output.iter() {
      info!(
        "[{:>3}] {:>8} {:02x?}",
        block_start / loop_samples,
        (block_start + event.offset) % loop_samples,
        event.data
      );
    }

    controller.log_diagnostics();
  }

  controller.stop();
  info!(
    "{} events recorded, {} free",
    processor.event_count(),
    processor.free_slots()
  );

  Ok(())
}

/// Kick on every beat, snare on the odd ones and hi-hats on the off-beats, played slightly late.
fn pattern(beat_samples: usize, loop_samples: usize) -> Vec<(usize, MessageBytes)> {
  let late = beat_samples / 10;
  let mut pattern = Vec::new();
  for (index, beat) in (0..loop_samples).step_by(beat_samples.max(1)).enumerate() {
    let mut hit = |position: usize, note: u8| {
      pattern.push((position + late, note_on(9, note, 100)));
      pattern.push((position + late + beat_samples / 4, note_off(9, note, 0)));
    };
    hit(beat, KICK);
    if index % 2 == 1 {
      hit(beat, SNARE);
    }
    hit(beat + beat_samples / 2, HIHAT);
  }
  pattern.retain(|(position, _)| *position < loop_samples);
  pattern.sort_by_key(|(position, _)| *position);
  pattern
}
