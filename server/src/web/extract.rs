// server/src/web/extract.rs

//! Request extractors: the bearer-token gate and the error handlers for
//! malformed JSON bodies, query strings and path segments.

use crate::errors::AppError;
use crate::services::Claims;
use crate::state::AppState;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use shopfront_core::wire::FieldIssue;
use tracing::debug;

/// The caller behind a valid, unrevoked bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: i64,
  pub email: String,
  pub claims: Claims,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

fn bearer_token(header_value: &str) -> Option<&str> {
  let (scheme, token) = header_value.trim().split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let header_value = req
    .headers()
    .get(AUTHORIZATION)
    .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))?
    .to_str()
    .map_err(|_| AppError::Unauthenticated("Invalid authorization header".to_string()))?;
  let token =
    bearer_token(header_value).ok_or_else(|| AppError::Unauthenticated("Invalid authorization header".to_string()))?;

  let claims = state.tokens.verify(token).map_err(|e| {
    debug!(reason = %e, "Rejected bearer token.");
    AppError::from(e)
  })?;
  Ok(AuthenticatedUser {
    user_id: claims.uid,
    email: claims.sub.clone(),
    claims,
  })
}

fn issue(loc: &[&str], msg: String, kind: &str) -> FieldIssue {
  FieldIssue {
    loc: loc.iter().map(|s| serde_json::Value::from(*s)).collect(),
    msg,
    kind: Some(kind.to_string()),
  }
}

pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .limit(64 * 1024)
    .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
      let field_issue = match &err {
        JsonPayloadError::ContentType => issue(
          &["body"],
          "Expected a JSON body (Content-Type: application/json)".to_string(),
          "content_type",
        ),
        JsonPayloadError::Deserialize(e) => issue(&["body"], e.to_string(), "value_error"),
        other => issue(&["body"], other.to_string(), "payload_error"),
      };
      AppError::InvalidFields(vec![field_issue]).into()
    })
}

pub fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
    AppError::InvalidFields(vec![issue(&["query"], err.to_string(), "value_error")]).into()
  })
}

pub fn path_config() -> web::PathConfig {
  web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
    AppError::InvalidFields(vec![issue(&["path"], err.to_string(), "value_error")]).into()
  })
}

#[cfg(test)]
mod tests {
  use super::bearer_token;

  #[test]
  fn bearer_scheme_is_case_insensitive() {
    assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    assert_eq!(bearer_token("bearer   abc"), Some("abc"));
    assert_eq!(bearer_token("Basic abc"), None);
    assert_eq!(bearer_token("Bearer "), None);
    assert_eq!(bearer_token("abc"), None);
  }
}
