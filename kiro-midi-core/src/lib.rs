pub mod messages;
mod tracker;

pub use messages::{MessageBytes, MessageKind, MAX_MESSAGE_SIZE};
pub use tracker::NoteTracker;
