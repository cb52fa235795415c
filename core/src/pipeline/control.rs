// verdant/src/pipeline/control.rs

/// Returned by a handler to continue the run or end it early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// End the run now. Remaining handlers and steps are not executed.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
