// server/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::{auth_service, user_service};
use crate::state::AppState;
use shopfront_core::{ContextData, Pipeline, PipelineControl, PipelineRegistry};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

const MAX_USERNAME_LEN: usize = 50;

/// Loose shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub(crate) fn looks_like_email(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && !email.chars().any(char::is_whitespace)
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
}

pub fn register_signup_pipeline(registry: &Arc<PipelineRegistry<AppError>>, _app_state: &AppState) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_user", false, None),
    ("hash_password", false, None),
    ("create_user_and_cart", false, None),
  ]);

  signup_p.on_root("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.email = guard.email.trim().to_lowercase();
      guard.username = guard.username.trim().to_string();

      event!(Level::DEBUG, email = %guard.email, "Validating signup input.");
      if !looks_like_email(&guard.email) {
        return Err(AppError::Validation("A valid email address is required".to_string()));
      }
      if guard.username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
      }
      if guard.username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
          "Username must be at most {} characters",
          MAX_USERNAME_LEN
        )));
      }
      if guard.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  signup_p.on_root("check_existing_user", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, username, db_pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.username.clone(), guard.app_state.db_pool.clone())
      };

      if user_service::email_or_username_taken(&db_pool, &email, &username).await? {
        warn!(email = %email, "Signup with an already registered email or username.");
        return Err(AppError::Validation(user_service::DUPLICATE_USER_MESSAGE.to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  signup_p.on_root("hash_password", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let password = ctx_data.take(|c| &mut c.password);
      // Argon2 is CPU bound; keep it off the async workers.
      let hash = tokio::task::spawn_blocking(move || auth_service::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;
      ctx_data.write().password_hash = Some(hash);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  signup_p.on_root("create_user_and_cart", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let password_hash = ctx_data.take(|c| &mut c.password_hash);
      let Some(password_hash) = password_hash else {
        return Err(AppError::Internal("Password hash missing before user creation.".to_string()));
      };
      let (email, username, db_pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.username.clone(), guard.app_state.db_pool.clone())
      };

      let user = user_service::create_user_with_cart(&db_pool, &email, &username, &password_hash).await?;
      info!(user_id = user.id, "User signed up.");
      ctx_data.write().created_user = Some(user);
      Ok(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(signup_p);
  tracing::info!("Sign-up pipeline registered.");
}

#[cfg(test)]
mod tests {
  use super::looks_like_email;

  #[test]
  fn email_shape() {
    assert!(looks_like_email("a@x.com"));
    assert!(!looks_like_email("ax.com"));
    assert!(!looks_like_email("a@x"));
    assert!(!looks_like_email("a b@x.com"));
    assert!(!looks_like_email("@x.com"));
    assert!(!looks_like_email("a@@x.com"));
  }
}
