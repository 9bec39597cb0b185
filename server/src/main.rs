// server/src/main.rs

use actix_web::HttpServer;
use anyhow::Context;
use shopfront_server::{build_app, AppConfig, AppState};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let json_logs = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE);
  if json_logs {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing();
  tracing::info!("Starting shopfront server...");

  let app_config = AppConfig::from_env().context("loading configuration")?;
  let server_address = app_config.server_address();
  let app_state = AppState::initialize(app_config)
    .await
    .context("initialising application state")?;

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || build_app(app_state.clone()))
    .bind(&server_address)
    .with_context(|| format!("binding {}", server_address))?
    .run()
    .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
