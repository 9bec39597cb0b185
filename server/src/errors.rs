// server/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use shopfront_core::wire::{ErrorBody, ErrorCode, FieldIssue};
use shopfront_core::{MoneyError, PipelineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  /// Request body or query did not match the expected shape.
  #[error("Invalid request fields: {}", .0.iter().map(|i| i.msg.as_str()).collect::<Vec<_>>().join("; "))]
  InvalidFields(Vec<FieldIssue>),

  #[error("Authentication Required: {0}")]
  Unauthenticated(String),

  #[error("Incorrect email or password")]
  InvalidCredentials,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Item not found in cart")]
  ItemNotInCart,

  #[error("Out of Stock: {0}")]
  OutOfStock(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Pipeline Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl AppError {
  pub fn code(&self) -> ErrorCode {
    match self {
      AppError::Validation(_) | AppError::InvalidFields(_) => ErrorCode::ValidationError,
      AppError::Unauthenticated(_) => ErrorCode::Unauthenticated,
      AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
      AppError::NotFound(_) => ErrorCode::NotFound,
      AppError::ItemNotInCart => ErrorCode::ItemNotInCart,
      AppError::OutOfStock(_) => ErrorCode::OutOfStock,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_)
      | AppError::PipelineHaltedByHandler => ErrorCode::InternalError,
    }
  }

  fn body(&self) -> ErrorBody {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::OutOfStock(m) | AppError::Unauthenticated(m) => {
        ErrorBody::message(self.code(), m.clone())
      }
      AppError::InvalidFields(issues) => ErrorBody::fields(issues.clone()),
      AppError::InvalidCredentials | AppError::ItemNotInCart => ErrorBody::message(self.code(), self.to_string()),
      // Internal details stay in the logs.
      _ => ErrorBody::message(self.code(), "Internal server error"),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<AppError>() {
      Ok(app_err) => return app_err,
      Err(err) => err,
    };
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl From<MoneyError> for AppError {
  fn from(err: MoneyError) -> Self {
    AppError::Validation(err.to_string())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::InvalidFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Unauthenticated(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) | AppError::ItemNotInCart => StatusCode::NOT_FOUND,
      AppError::OutOfStock(_) => StatusCode::CONFLICT,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::debug!(application_error = %self, status = status.as_u16(), "Responding with client error");
    }

    let mut builder = HttpResponse::build(status);
    if status == StatusCode::UNAUTHORIZED {
      builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
    }
    builder.json(self.body())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
