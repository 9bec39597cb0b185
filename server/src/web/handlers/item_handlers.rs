// server/src/web/handlers/item_handlers.rs

use actix_web::{web, HttpResponse};
use shopfront_core::wire::{ItemQuery, ItemView, NewItemRequest};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::catalog_service::{self, ItemFilter};
use crate::state::AppState;
use crate::web::extract::AuthenticatedUser;

#[instrument(name = "handler::list_items", skip(app_state))]
pub async fn list_items_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ItemQuery>,
) -> Result<HttpResponse, AppError> {
  let filter = ItemFilter::try_from(&query.into_inner())?;
  let items: Vec<ItemView> = catalog_service::list_items(&app_state.db_pool, &filter)
    .await?
    .into_iter()
    .map(ItemView::from)
    .collect();
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::get_item", skip(app_state, path), fields(item_id = %path.as_ref()))]
pub async fn get_item_handler(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
  let item = catalog_service::get_item(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(item.view()))
}

#[instrument(
    name = "handler::create_item",
    skip(app_state, req_payload, auth_user),
    fields(user_id = auth_user.user_id, name = %req_payload.name)
)]
pub async fn create_item_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<NewItemRequest>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item = catalog_service::create_item(&app_state.db_pool, &req_payload).await?;
  info!(item_id = item.id, "Item created.");
  Ok(HttpResponse::Created().json(item.view()))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog_service::list_categories(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(categories))
}
