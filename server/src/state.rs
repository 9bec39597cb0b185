// server/src/state.rs

use crate::config::AppConfig;
use crate::db;
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::services::TokenService;
use shopfront_core::PipelineRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub pipelines: Arc<PipelineRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub tokens: Arc<TokenService>,
}

impl AppState {
  /// Wires state around an already opened pool: schema, optional seed,
  /// token service and pipelines.
  pub async fn with_pool(config: AppConfig, db_pool: SqlitePool) -> Result<Self> {
    db::init_schema(&db_pool).await?;
    if config.seed_db {
      db::seed::seed_catalog(&db_pool).await?;
    }

    let tokens = Arc::new(TokenService::new(&config.token_secret, config.access_token_expire_minutes));
    let state = AppState {
      db_pool,
      pipelines: Arc::new(PipelineRegistry::new()),
      config: Arc::new(config),
      tokens,
    };
    pipelines::register_all_pipelines(&state.pipelines, &state);
    info!(environment = ?state.config.environment, "Application state initialised.");
    Ok(state)
  }

  pub async fn initialize(config: AppConfig) -> Result<Self> {
    let db_pool = db::connect(&config).await?;
    Self::with_pool(config, db_pool).await
  }
}
