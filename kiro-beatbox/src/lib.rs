mod beatbox;
pub mod buffer;
mod config;
mod control;
pub mod diagnostics;
mod error;
pub mod event;
pub mod loop_set;
pub mod pending;
pub mod pool;
pub mod processor;
pub mod quantizer;
mod state;
mod transport;

pub use crate::beatbox::Beatbox;
pub use crate::buffer::{MidiBuffer, MidiEvent};
pub use crate::config::BeatboxConfig;
pub use crate::control::BeatboxController;
pub use crate::diagnostics::Diagnostic;
pub use crate::error::{BeatboxError, Result};
pub use crate::processor::{ProcessContext, Processor};
pub use crate::state::{BeatboxState, STATE_TYPE};
pub use crate::transport::BeatboxProcessor;
