// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

const DEV_TOKEN_SECRET: &str = "shopfront-dev-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
  Development,
  Production,
}

impl Environment {
  fn parse(raw: &str) -> Result<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "development" | "dev" => Ok(Environment::Development),
      "production" | "prod" => Ok(Environment::Production),
      other => Err(AppError::Config(format!("Invalid ENVIRONMENT value: '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub environment: Environment,
  pub token_secret: String,
  pub access_token_expire_minutes: i64,
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| "sqlite://shopfront.db?mode=rwc".to_string());
    let db_max_connections = get_env("DB_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;
    let environment = Environment::parse(&get_env("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()))?;

    let token_secret = match (get_env("TOKEN_SECRET"), environment) {
      (Ok(secret), _) if !secret.is_empty() => secret,
      (_, Environment::Production) => {
        return Err(AppError::Config("TOKEN_SECRET must be set in production.".to_string()));
      }
      (_, Environment::Development) => {
        tracing::warn!("TOKEN_SECRET not set, using the development fallback secret.");
        DEV_TOKEN_SECRET.to_string()
      }
    };

    let access_token_expire_minutes = get_env("ACCESS_TOKEN_EXPIRE_MINUTES")
      .unwrap_or_else(|_| "30".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: {}", e)))?;
    if access_token_expire_minutes <= 0 {
      return Err(AppError::Config("ACCESS_TOKEN_EXPIRE_MINUTES must be positive.".to_string()));
    }

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(
      server_host = %server_host,
      server_port,
      environment = ?environment,
      "Application configuration loaded."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      environment,
      token_secret,
      access_token_expire_minutes,
      seed_db,
    })
  }

  /// Configuration for tests and local tooling: in-memory database and a
  /// fixed secret.
  pub fn for_tests() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      database_url: "sqlite::memory:".to_string(),
      db_max_connections: 1,
      environment: Environment::Development,
      token_secret: "test-secret".to_string(),
      access_token_expire_minutes: 30,
      seed_db: false,
    }
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
