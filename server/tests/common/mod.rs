// tests/common/mod.rs
#![allow(dead_code, unused_macros)]

use chrono::Utc;
use once_cell::sync::Lazy;
use shopfront_server::{AppConfig, AppState};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Fresh application state over a private in-memory database.
pub async fn test_state() -> AppState {
  setup_tracing();
  AppState::initialize(AppConfig::for_tests())
    .await
    .expect("in-memory application state")
}

/// A database file under the temp dir, for tests that need several
/// connections writing at once.
pub struct TempDb {
  pub path: PathBuf,
}

impl TempDb {
  pub fn new() -> Self {
    let path = std::env::temp_dir().join(format!("shopfront-test-{}.db", uuid::Uuid::new_v4()));
    Self { path }
  }

  pub fn url(&self) -> String {
    format!("sqlite://{}?mode=rwc", self.path.display())
  }
}

impl Drop for TempDb {
  fn drop(&mut self) {
    for suffix in ["", "-wal", "-shm"] {
      let mut p = self.path.clone().into_os_string();
      p.push(suffix);
      let _ = std::fs::remove_file(p);
    }
  }
}

pub async fn file_backed_state(db: &TempDb, max_connections: u32) -> AppState {
  setup_tracing();
  let config = AppConfig {
    database_url: db.url(),
    db_max_connections: max_connections,
    ..AppConfig::for_tests()
  };
  AppState::initialize(config).await.expect("file-backed application state")
}

pub async fn insert_item(pool: &SqlitePool, name: &str, category: &str, price_cents: i64, stock: i64) -> i64 {
  insert_item_with_description(pool, name, None, category, price_cents, stock).await
}

pub async fn insert_item_with_description(
  pool: &SqlitePool,
  name: &str,
  description: Option<&str>,
  category: &str,
  price_cents: i64,
  stock: i64,
) -> i64 {
  sqlx::query_scalar(
    "INSERT INTO items (name, description, price_cents, category, image_url, stock_quantity, created_at) \
     VALUES (?, ?, ?, ?, NULL, ?, ?) RETURNING id",
  )
  .bind(name)
  .bind(description)
  .bind(price_cents)
  .bind(category)
  .bind(stock)
  .bind(Utc::now())
  .fetch_one(pool)
  .await
  .expect("insert item")
}

/// Ids are assigned in insertion order:
///
/// | id | name | category | price | stock |
/// |---|---|---|---|---|
/// | 1 | Pocket Dictionary | Books | 8.50 | 10 |
/// | 2 | Desk Lamp | Home | 49.99 | 45 |
/// | 3 | The Rust Programming Language | Books | 39.99 | 5 |
/// | 4 | Gardening Atlas | Books | 50.00 | 3 |
/// | 5 | Collector's Box Set | Books | 120.00 | 1 |
/// | 6 | Sold Out Novel | Books | 15.00 | 0 |
/// | 7 | USB-C Cable | Electronics | 12.00 | 100 |
pub async fn seed_test_catalog(pool: &SqlitePool) {
  insert_item(pool, "Pocket Dictionary", "Books", 850, 10).await;
  insert_item_with_description(pool, "Desk Lamp", Some("Adjustable LED lamp"), "Home", 4999, 45).await;
  insert_item(pool, "The Rust Programming Language", "Books", 3999, 5).await;
  insert_item(pool, "Gardening Atlas", "Books", 5000, 3).await;
  insert_item(pool, "Collector's Box Set", "Books", 12000, 1).await;
  insert_item(pool, "Sold Out Novel", "Books", 1500, 0).await;
  insert_item_with_description(pool, "USB-C Cable", Some("Braided 100%_copper, 2m"), "Electronics", 1200, 100).await;
}

/// Sends a `TestRequest` and returns `(status, json body, headers)`.
macro_rules! send {
  ($app:expr, $req:expr) => {{
    let resp = actix_web::test::call_service($app, $req.to_request()).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = actix_web::test::read_body(resp).await;
    let json: serde_json::Value = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, json, headers)
  }};
}

/// Signs a user up, logs in and returns the bearer token.
macro_rules! signup_and_login {
  ($app:expr, $email:expr, $username:expr, $password:expr) => {{
    let (status, body, _) = send!(
      $app,
      actix_web::test::TestRequest::post().uri("/auth/signup").set_json(serde_json::json!({
        "email": $email, "username": $username, "password": $password
      }))
    );
    assert_eq!(status, actix_web::http::StatusCode::CREATED, "signup failed: {}", body);
    let (status, body, _) = send!(
      $app,
      actix_web::test::TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": $email, "password": $password }))
    );
    assert_eq!(status, actix_web::http::StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().expect("access_token").to_string()
  }};
}

macro_rules! bearer {
  ($token:expr) => {
    ("Authorization", format!("Bearer {}", $token))
  };
}
