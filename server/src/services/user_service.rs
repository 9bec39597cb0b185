// server/src/services/user_service.rs

use crate::errors::{AppError, Result};
use crate::models::User;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

const USER_COLUMNS: &str = "id, email, username, password_hash, created_at";

pub const DUPLICATE_USER_MESSAGE: &str = "Email or username already registered";

#[instrument(name = "user_service::find_by_email", skip(pool), err(Display))]
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
    .bind(email)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn email_or_username_taken(pool: &SqlitePool, email: &str, username: &str) -> Result<bool> {
  let taken = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? OR username = ?)")
    .bind(email)
    .bind(username)
    .fetch_one(pool)
    .await?;
  Ok(taken)
}

/// Inserts the user and their (empty) cart in one transaction.
#[instrument(name = "user_service::create_user_with_cart", skip(pool, password_hash), err(Display))]
pub async fn create_user_with_cart(pool: &SqlitePool, email: &str, username: &str, password_hash: &str) -> Result<User> {
  let now = Utc::now();
  let mut tx = pool.begin().await?;

  let inserted = sqlx::query_as::<_, User>(&format!(
    "INSERT INTO users (email, username, password_hash, created_at) VALUES (?, ?, ?, ?) RETURNING {}",
    USER_COLUMNS
  ))
  .bind(email)
  .bind(username)
  .bind(password_hash)
  .bind(now)
  .fetch_one(&mut *tx)
  .await;

  let user = match inserted {
    Ok(user) => user,
    // Lost a race with a concurrent signup for the same email or username.
    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
      warn!("Unique constraint hit while creating user.");
      return Err(AppError::Validation(DUPLICATE_USER_MESSAGE.to_string()));
    }
    Err(e) => return Err(e.into()),
  };

  sqlx::query("INSERT INTO carts (user_id, created_at, updated_at) VALUES (?, ?, ?)")
    .bind(user.id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  info!(user_id = user.id, "User and cart created.");
  Ok(user)
}
