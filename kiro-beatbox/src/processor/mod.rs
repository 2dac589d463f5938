pub(crate) mod context;

pub use context::ProcessContext;

/// Something rendered by the host once per audio block.
pub trait Processor {
  fn render(&mut self, context: &mut ProcessContext);
}
