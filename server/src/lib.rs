// server/src/lib.rs

//! Shopfront REST backend: auth, catalog and per-user carts over SQLite.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Compress;
use actix_web::{web as actix_data, App, HttpResponse};
use shopfront_core::wire::{ErrorBody, ErrorCode};
use std::time::Instant;
use tracing_actix_web::TracingLogger;

pub use crate::config::AppConfig;
pub use crate::errors::AppError;
pub use crate::state::AppState;

const PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");

async fn not_found() -> HttpResponse {
  HttpResponse::NotFound().json(ErrorBody::message(ErrorCode::NotFound, "Not Found"))
}

/// Builds the application around `state`. Shared by the binary and tests.
pub fn build_app(
  state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  App::new()
    .app_data(actix_data::Data::new(state))
    .app_data(web::extract::json_config())
    .app_data(web::extract::query_config())
    .app_data(web::extract::path_config())
    .configure(web::configure_app_routes)
    .default_service(actix_data::to(not_found))
    .wrap_fn(|req, srv| {
      let started = Instant::now();
      let fut = srv.call(req);
      async move {
        let mut res = fut.await?;
        let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
        if let Ok(value) = HeaderValue::from_str(&elapsed) {
          res.headers_mut().insert(PROCESS_TIME_HEADER, value);
        }
        Ok(res)
      }
    })
    .wrap(Compress::default())
    .wrap(TracingLogger::default())
}
