// verdant/src/pipeline/execution.rs

use tracing::{event, span, Instrument, Level};

use super::context::ContextData;
use super::control::{PipelineControl, PipelineResult};
use super::definition::{Pipeline, PipelineError};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step in declaration order against `ctx_data`.
  ///
  /// The first handler error aborts the run and is returned as is. A step
  /// without handlers is a configuration error.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, pipeline = self.name, "Pipeline run starting.");

    for (step_idx, step_name) in self.steps.iter().enumerate() {
      let handlers = match self.handlers.get(step_name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ => {
          event!(Level::ERROR, pipeline = self.name, step = %step_name, "Step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            step_name: step_name.clone(),
          }));
        }
      };

      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        pipeline = self.name,
        step = step_name.as_str(),
        step_index = step_idx
      );

      let control = async {
        for handler in handlers {
          match handler(ctx_data.clone()).await {
            Ok(PipelineControl::Continue) => {}
            Ok(PipelineControl::Stop) => return Ok(PipelineControl::Stop),
            Err(e) => {
              event!(Level::ERROR, error = %e, "Step handler failed.");
              return Err(e);
            }
          }
        }
        Ok(PipelineControl::Continue)
      }
      .instrument(step_span)
      .await?;

      if control == PipelineControl::Stop {
        event!(Level::INFO, pipeline = self.name, step = %step_name, "Pipeline stopped by step.");
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, pipeline = self.name, "Pipeline run completed.");
    Ok(PipelineResult::Completed)
  }
}
