// server/src/pipelines/login_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::LoginCtxData;
use crate::services::{auth_service, user_service};
use crate::state::AppState;
use shopfront_core::{ContextData, Pipeline, PipelineControl, PipelineRegistry};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

/// Registers the login pipeline. Unknown email and wrong password fail the
/// same way so the response does not reveal which accounts exist.
pub fn register_login_pipeline(registry: &Arc<PipelineRegistry<AppError>>, _app_state: &AppState) {
  let mut login_p = Pipeline::<LoginCtxData, AppError>::new(&[
    ("find_user_by_email", false, None),
    ("verify_password", false, None),
    ("issue_access_token", false, None),
  ]);

  login_p.on_root("find_user_by_email", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let (email, db_pool) = {
        let guard = ctx_data.read();
        (guard.email.trim().to_lowercase(), guard.app_state.db_pool.clone())
      };

      event!(Level::DEBUG, email = %email, "Looking up user for login.");
      match user_service::find_by_email(&db_pool, &email).await? {
        Some(user) => {
          ctx_data.write().user = Some(user);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(email = %email, "Login for unknown email.");
          Err(AppError::InvalidCredentials)
        }
      }
    })
  });

  login_p.on_root("verify_password", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let password = ctx_data.take(|c| &mut c.password);
      let stored_hash = ctx_data
        .map_read(|c| &c.user)
        .as_ref()
        .map(|u| u.password_hash.clone())
        .ok_or_else(|| AppError::Internal("User missing before password check.".to_string()))?;

      let matches = tokio::task::spawn_blocking(move || auth_service::verify_password(&stored_hash, &password))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))??;
      if !matches {
        warn!("Login with wrong password.");
        return Err(AppError::InvalidCredentials);
      }
      Ok(PipelineControl::Continue)
    })
  });

  login_p.on_root("issue_access_token", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let user = guard
        .user
        .clone()
        .ok_or_else(|| AppError::Internal("User missing before token issue.".to_string()))?;
      let issued = guard.app_state.tokens.issue(&user)?;
      info!(user_id = user.id, expires_in = issued.expires_in, "Access token issued.");
      guard.issued_token = Some(issued);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(login_p);
  tracing::info!("Login pipeline registered.");
}
