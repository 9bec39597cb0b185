// server/src/db/mod.rs

//! Pool construction and schema bootstrap.

pub mod seed;

use crate::config::AppConfig;
use crate::errors::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

const SCHEMA: &[&str] = &[
  r#"CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
  )"#,
  r#"CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
    category TEXT NOT NULL,
    image_url TEXT,
    stock_quantity INTEGER NOT NULL DEFAULT 0 CHECK (stock_quantity >= 0),
    created_at TEXT NOT NULL
  )"#,
  "CREATE INDEX IF NOT EXISTS idx_items_category ON items (category)",
  "CREATE INDEX IF NOT EXISTS idx_items_name ON items (name)",
  r#"CREATE TABLE IF NOT EXISTS carts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
  )"#,
  r#"CREATE TABLE IF NOT EXISTS cart_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cart_id INTEGER NOT NULL REFERENCES carts (id) ON DELETE CASCADE,
    item_id INTEGER NOT NULL REFERENCES items (id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL CHECK (quantity >= 1),
    added_at TEXT NOT NULL,
    UNIQUE (cart_id, item_id)
  )"#,
];

fn is_in_memory(database_url: &str) -> bool {
  database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Opens the pool described by `config`.
///
/// An in-memory database lives only as long as its connection, so it gets a
/// single connection that is never recycled.
#[instrument(name = "db::connect", skip(config), err(Display))]
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
  let mut options = SqliteConnectOptions::from_str(&config.database_url)?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(Duration::from_secs(5));

  let pool_options = if is_in_memory(&config.database_url) {
    SqlitePoolOptions::new()
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
  } else {
    options = options.journal_mode(SqliteJournalMode::Wal);
    SqlitePoolOptions::new().max_connections(config.db_max_connections.max(1))
  };

  let pool = pool_options.connect_with(options).await?;
  info!(max_connections = pool.options().get_max_connections(), "Database pool ready.");
  Ok(pool)
}

#[instrument(name = "db::init_schema", skip(pool), err(Display))]
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
  for statement in SCHEMA {
    sqlx::query(statement).execute(pool).await?;
  }
  info!(tables = 4, "Database schema ensured.");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_urls_are_detected() {
    assert!(is_in_memory("sqlite::memory:"));
    assert!(is_in_memory("sqlite://shop?mode=memory&cache=shared"));
    assert!(!is_in_memory("sqlite://shopfront.db?mode=rwc"));
  }
}
