// server/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::state::AppState;
use crate::web::handlers::{auth_handlers, cart_handlers, item_handlers};

async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
    Ok(_) => HttpResponse::Ok().json(json!({ "status": "ok" })),
    Err(e) => {
      warn!(error = %e, "Health check could not reach the database.");
      HttpResponse::ServiceUnavailable().json(json!({ "status": "degraded" }))
    }
  }
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/auth")
        .route("/signup", web::post().to(auth_handlers::signup_handler))
        .route("/login", web::post().to(auth_handlers::login_handler))
        .route("/logout", web::post().to(auth_handlers::logout_handler)),
    )
    .service(
      web::resource("/items")
        .route(web::get().to(item_handlers::list_items_handler))
        .route(web::post().to(item_handlers::create_item_handler)),
    )
    .route("/items/{item_id}", web::get().to(item_handlers::get_item_handler))
    .route("/categories", web::get().to(item_handlers::list_categories_handler))
    .service(
      web::scope("/cart")
        .route("", web::get().to(cart_handlers::get_cart_handler))
        .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
        // Must precede `/items/{item_id}`, which would otherwise capture "clear".
        .route("/items/clear", web::delete().to(cart_handlers::clear_cart_handler))
        .service(
          web::resource("/items/{item_id}")
            .route(web::put().to(cart_handlers::update_cart_item_handler))
            .route(web::delete().to(cart_handlers::remove_cart_item_handler)),
        ),
    );
}
