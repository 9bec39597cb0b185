// core/src/pipeline/execution.rs

use super::context_data::ContextData;
use super::control::{PipelineControl, PipelineResult};
use super::definition::Pipeline;
use super::hooks::Handler;
use crate::error::PipelineError;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// A step is skipped when its `skip_if` condition holds, or when it is
  /// optional and has no handlers. A required step without handlers fails
  /// the run with [`PipelineError::HandlerMissing`].
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by condition.");
          continue;
        }
      }

      let handlers = match self.handlers.get(step_name) {
        Some(h) if !h.is_empty() => h,
        _ if step_def.optional => {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step = step_name, "Required step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      let step_span = span!(Level::DEBUG, "pipeline_step", step = step_name, step_index = step_idx);
      let control = run_handlers(handlers, &ctx_data)
        .instrument(step_span)
        .await
        .map_err(|e| {
          event!(Level::WARN, step = step_name, error = %e, "Handler failed.");
          e
        })?;
      if control == PipelineControl::Stop {
        event!(Level::INFO, step = step_name, "Pipeline stopped by handler.");
        return Ok(PipelineResult::Stopped);
      }
    }

    Ok(PipelineResult::Completed)
  }
}

async fn run_handlers<TData, Err>(
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PipelineControl, Err>
where
  TData: 'static + Send + Sync,
{
  for handler in handlers {
    if handler(ctx_data.clone()).await? == PipelineControl::Stop {
      return Ok(PipelineControl::Stop);
    }
  }
  Ok(PipelineControl::Continue)
}
