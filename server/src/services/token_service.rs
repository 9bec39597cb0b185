// server/src/services/token_service.rs

//! HS256 bearer tokens in the compact JWT layout
//! (`base64url(header).base64url(claims).base64url(signature)`).

use crate::errors::AppError;
use crate::models::User;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const MAX_TOKEN_LEN: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// The user's email.
  pub sub: String,
  pub uid: i64,
  pub iat: i64,
  pub exp: i64,
  pub jti: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
  #[error("token is malformed")]
  Malformed,
  #[error("token signature is invalid")]
  BadSignature,
  #[error("token has expired")]
  Expired,
  #[error("token has been revoked")]
  Revoked,
  #[error("signing key is unusable")]
  InvalidKey,
}

impl From<TokenError> for AppError {
  fn from(err: TokenError) -> Self {
    match err {
      TokenError::InvalidKey => AppError::Internal(err.to_string()),
      _ => AppError::Unauthenticated("Could not validate credentials".to_string()),
    }
  }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
  pub access_token: String,
  pub expires_in: i64,
  pub claims: Claims,
}

/// Issues and verifies access tokens and remembers revoked ones until they
/// would have expired anyway.
pub struct TokenService {
  key: Vec<u8>,
  ttl: Duration,
  revoked: RwLock<HashMap<String, i64>>,
}

impl std::fmt::Debug for TokenService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TokenService")
      .field("ttl_secs", &self.ttl.num_seconds())
      .field("revoked", &self.revoked.read().len())
      .finish()
  }
}

impl TokenService {
  pub fn new(secret: &str, ttl_minutes: i64) -> Self {
    Self {
      key: secret.as_bytes().to_vec(),
      ttl: Duration::minutes(ttl_minutes),
      revoked: RwLock::new(HashMap::new()),
    }
  }

  fn mac(&self) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::InvalidKey)
  }

  #[instrument(name = "token_service::issue", skip(self, user), fields(user_id = user.id))]
  pub fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
    self.issue_at(user, Utc::now())
  }

  pub(crate) fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
    let claims = Claims {
      sub: user.email.clone(),
      uid: user.id,
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
      jti: Uuid::new_v4().to_string(),
    };
    let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
    let signing_input = format!("{}.{}", URL_SAFE_NO_PAD.encode(HEADER_JSON), URL_SAFE_NO_PAD.encode(payload));

    let mut mac = self.mac()?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    debug!(jti = %claims.jti, exp = claims.exp, "Issued access token.");
    Ok(IssuedToken {
      access_token: format!("{}.{}", signing_input, signature),
      expires_in: self.ttl.num_seconds(),
      claims,
    })
  }

  pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
    self.verify_at(token, Utc::now())
  }

  pub(crate) fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    if token.is_empty() || token.len() > MAX_TOKEN_LEN {
      return Err(TokenError::Malformed);
    }
    let mut parts = token.split('.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
      (Some(h), Some(p), Some(s), None) => (h, p, s),
      _ => return Err(TokenError::Malformed),
    };

    let header_bytes = URL_SAFE_NO_PAD.decode(header).map_err(|_| TokenError::Malformed)?;
    let header_value: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
    if header_value.get("alg").and_then(|a| a.as_str()) != Some("HS256") {
      return Err(TokenError::Malformed);
    }

    let expected = URL_SAFE_NO_PAD.decode(signature).map_err(|_| TokenError::Malformed)?;
    let mut mac = self.mac()?;
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).map_err(|_| TokenError::BadSignature)?;

    let payload_bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|_| TokenError::Malformed)?;
    let claims: Claims = serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::Malformed)?;

    if claims.exp <= now.timestamp() {
      return Err(TokenError::Expired);
    }
    if self.is_revoked(&claims.jti) {
      return Err(TokenError::Revoked);
    }
    Ok(claims)
  }

  /// Denylists the token id until its expiry and drops entries that have
  /// expired since.
  pub fn revoke(&self, claims: &Claims) {
    let now = Utc::now().timestamp();
    let mut revoked = self.revoked.write();
    revoked.retain(|_, exp| *exp > now);
    revoked.insert(claims.jti.clone(), claims.exp);
    debug!(jti = %claims.jti, outstanding = revoked.len(), "Revoked access token.");
  }

  pub fn is_revoked(&self, jti: &str) -> bool {
    self.revoked.read().contains_key(jti)
  }
}
