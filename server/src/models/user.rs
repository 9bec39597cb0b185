// server/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfront_core::wire::UserSummary;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: i64,
  pub email: String,
  pub username: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id: self.id,
      email: self.email.clone(),
      username: self.username.clone(),
      created_at: self.created_at,
    }
  }
}
