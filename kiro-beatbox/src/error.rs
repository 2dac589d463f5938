use thiserror::Error;

use kiro_time::TimeError;

pub type Result<T> = core::result::Result<T, BeatboxError>;

#[derive(Debug, Error)]
pub enum BeatboxError {
  #[error("Time: {0}")]
  Time(#[from] TimeError),

  #[error("The event pool needs at least one event")]
  EmptyPool,

  #[error("Unexpected state type '{0}'")]
  StateType(String),

  #[error("State: {0}")]
  Json(#[from] serde_json::Error),
}
