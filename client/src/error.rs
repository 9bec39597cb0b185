// client/src/error.rs

use shopfront_core::wire::{ErrorBody, ErrorCode};
use thiserror::Error;

const NETWORK_MESSAGE: &str = "Unable to reach the server. Check your connection and try again.";

/// Every failure the gateway can report, already normalized from the
/// server's error body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
  #[error("{0}")]
  Unauthenticated(String),

  #[error("{0}")]
  InvalidCredentials(String),

  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  ItemNotInCart(String),

  #[error("{0}")]
  OutOfStock(String),

  #[error("Server error ({status}): {message}")]
  Server { status: u16, message: String },

  /// Transport-level failure: connection refused, timeout, TLS, ...
  #[error("Network error: {0}")]
  Network(String),

  #[error("Unexpected response: {0}")]
  Decode(String),
}

impl ClientError {
  /// Maps a non-2xx response. The `code` tag wins; the status decides when
  /// the tag is missing or unknown.
  pub fn from_response(status: u16, body: &[u8]) -> Self {
    let parsed = ErrorBody::parse(body);
    let message = parsed
      .as_ref()
      .map(|b| b.detail.to_message())
      .filter(|m| !m.is_empty())
      .unwrap_or_else(|| format!("Request failed with status {}", status));

    match parsed.and_then(|b| b.code) {
      Some(ErrorCode::Unauthenticated) => ClientError::Unauthenticated(message),
      Some(ErrorCode::InvalidCredentials) => ClientError::InvalidCredentials(message),
      Some(ErrorCode::ValidationError) => ClientError::Validation(message),
      Some(ErrorCode::NotFound) => ClientError::NotFound(message),
      Some(ErrorCode::ItemNotInCart) => ClientError::ItemNotInCart(message),
      Some(ErrorCode::OutOfStock) => ClientError::OutOfStock(message),
      Some(ErrorCode::InternalError) | Some(ErrorCode::Unknown) | None => match status {
        401 => ClientError::Unauthenticated(message),
        400 | 422 => ClientError::Validation(message),
        404 => ClientError::NotFound(message),
        409 => ClientError::OutOfStock(message),
        _ => ClientError::Server { status, message },
      },
    }
  }

  /// True for failures that mean the session is gone or was never valid.
  pub fn is_auth(&self) -> bool {
    matches!(self, ClientError::Unauthenticated(_) | ClientError::InvalidCredentials(_))
  }

  /// Text suitable for a notification.
  pub fn user_message(&self) -> String {
    match self {
      ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
      ClientError::Server { .. } | ClientError::Decode(_) => "Something went wrong. Please try again.".to_string(),
      other => other.to_string(),
    }
  }
}

impl From<reqwest::Error> for ClientError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      ClientError::Decode(err.to_string())
    } else {
      ClientError::Network(err.to_string())
    }
  }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn code_tag_decides_the_variant() {
    let err = ClientError::from_response(404, br#"{"detail":"Item not found in cart","code":"item_not_in_cart"}"#);
    assert_eq!(err, ClientError::ItemNotInCart("Item not found in cart".into()));

    let err = ClientError::from_response(401, br#"{"detail":"Incorrect email or password","code":"invalid_credentials"}"#);
    assert!(err.is_auth());
    assert_eq!(err.user_message(), "Incorrect email or password");
  }

  #[test]
  fn status_decides_without_a_code() {
    let err = ClientError::from_response(409, br#"{"detail":"Only 2 items available in stock"}"#);
    assert_eq!(err, ClientError::OutOfStock("Only 2 items available in stock".into()));

    let err = ClientError::from_response(401, br#"{"detail":"Not authenticated"}"#);
    assert_eq!(err, ClientError::Unauthenticated("Not authenticated".into()));
  }

  #[test]
  fn array_details_collapse_into_one_message() {
    let raw = br#"{"detail":[{"loc":["body","quantity"],"msg":"field required","type":"missing"},{"msg":"value is not a valid integer"}]}"#;
    let err = ClientError::from_response(422, raw);
    assert_eq!(
      err,
      ClientError::Validation("field required; value is not a valid integer".into())
    );
  }

  #[test]
  fn unreadable_bodies_fall_back_to_the_status() {
    let err = ClientError::from_response(502, b"<html>Bad Gateway</html>");
    assert_eq!(
      err,
      ClientError::Server {
        status: 502,
        message: "Request failed with status 502".into()
      }
    );
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
  }

  #[test]
  fn network_failures_get_a_generic_message() {
    let err = ClientError::Network("connection refused".into());
    assert_eq!(err.user_message(), NETWORK_MESSAGE);
    assert!(!err.is_auth());
  }
}
