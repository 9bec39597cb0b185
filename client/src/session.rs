// client/src/session.rs

use chrono::{DateTime, Duration, Utc};
use shopfront_core::wire::TokenResponse;

/// A logged-in session. Expiry is recorded for display only; requests are
/// always sent and the server has the final word.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
  pub access_token: String,
  pub issued_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn from_token_response(resp: &TokenResponse, now: DateTime<Utc>) -> Self {
    Self {
      access_token: resp.access_token.clone(),
      issued_at: now,
      expires_at: now + Duration::seconds(resp.expires_in.max(0)),
    }
  }

  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }

  pub(crate) fn authorization(&self) -> String {
    format!("Bearer {}", self.access_token)
  }
}
