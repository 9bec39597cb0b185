// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use shopfront_core::wire::{LoginRequest, MessageResponse, SignupRequest, TokenResponse};
use shopfront_core::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{LoginCtxData, SignupCtxData};
use crate::state::AppState;
use crate::web::extract::AuthenticatedUser;

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
  let SignupRequest {
    email,
    password,
    username,
  } = req_payload.into_inner();
  let ctx = ContextData::new(SignupCtxData::new(app_state.get_ref().clone(), email, username, password));

  match app_state.pipelines.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let user = ctx.take(|c| &mut c.created_user).ok_or_else(|| {
        warn!("Signup pipeline completed without a created user.");
        AppError::Internal("Signup completed without creating a user.".to_string())
      })?;
      info!(user_id = user.id, "Signup successful.");
      Ok(HttpResponse::Created().json(user.summary()))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
  let LoginRequest { email, password } = req_payload.into_inner();
  let ctx = ContextData::new(LoginCtxData::new(app_state.get_ref().clone(), email, password));

  match app_state.pipelines.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let issued = ctx.take(|c| &mut c.issued_token).ok_or_else(|| {
        warn!("Login pipeline completed without issuing a token.");
        AppError::Internal("Login completed without a token.".to_string())
      })?;
      Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: issued.access_token,
        token_type: "bearer".to_string(),
        expires_in: issued.expires_in,
      }))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}

#[instrument(name = "handler::logout", skip(app_state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.tokens.revoke(&auth_user.claims);
  info!("User logged out.");
  Ok(HttpResponse::Ok().json(MessageResponse {
    message: "Successfully logged out".to_string(),
  }))
}
