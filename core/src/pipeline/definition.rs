// verdant/src/pipeline/definition.rs

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::context::ContextData;
use super::control::PipelineControl;

/// Boxed async step handler over `ContextData<TData>`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>> + Send + Sync,
>;

/// Misconfiguration detected while running a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step '{step_name}' ran before '{field}' was populated")]
  StateMissing { step_name: String, field: &'static str },
}

pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<String>,
  pub(crate) handlers: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub fn new(name: &'static str, steps: &[&str]) -> Self {
    Self {
      name,
      steps: steps.iter().map(|s| (*s).to_string()).collect(),
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(String::as_str)
  }

  /// Registers a handler for `step_name`. Handlers of one step run in
  /// registration order.
  ///
  /// Panics if the step was not declared in [`Pipeline::new`]; a typo in a step
  /// name is a setup bug, not a runtime condition.
  pub fn on_step<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    if !self.steps.iter().any(|s| s == step_name) {
      panic!("pipeline '{}' has no step named '{}'", self.name, step_name);
    }
    let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
  }
}
