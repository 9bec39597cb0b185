// server/src/pipelines/mod.rs

//! Defines and registers the application's pipelines.

use crate::errors::AppError;
use crate::state::AppState;
use shopfront_core::PipelineRegistry;
use std::sync::Arc;

pub mod contexts;

pub mod cart_pipeline;
pub mod login_pipeline;
pub mod signup_pipeline;

/// Registers every pipeline. Called once while building [`AppState`].
pub fn register_all_pipelines(registry: &Arc<PipelineRegistry<AppError>>, app_state: &AppState) {
  tracing::info!("Registering pipelines...");

  signup_pipeline::register_signup_pipeline(registry, app_state);
  login_pipeline::register_login_pipeline(registry, app_state);
  cart_pipeline::register_cart_mutation_pipeline(registry, app_state);

  tracing::info!("All application pipelines registered.");
}
