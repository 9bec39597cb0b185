// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use shopfront_core::wire::{AddToCartRequest, CartView, UpdateQuantityRequest};
use shopfront_core::{ContextData, PipelineResult};
use tracing::{instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{CartMutationCtxData, CartOp};
use crate::services::cart_service::{self, AddOutcome};
use crate::state::AppState;
use crate::web::extract::AuthenticatedUser;

/// Runs one mutation through the cart pipeline and returns the stored cart.
async fn run_cart_op(
  app_state: &web::Data<AppState>,
  auth_user: &AuthenticatedUser,
  op: CartOp,
) -> Result<(CartView, Option<AddOutcome>), AppError> {
  let ctx = ContextData::new(CartMutationCtxData::new(app_state.get_ref().clone(), auth_user.user_id, op));

  match app_state.pipelines.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let mut guard = ctx.write();
      let cart = guard.cart.take().ok_or_else(|| {
        warn!(op = op.name(), "Cart pipeline completed without loading the cart.");
        AppError::Internal("Cart update completed, but the cart is unavailable.".to_string())
      })?;
      Ok((cart, guard.add_outcome))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::load_cart(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = auth_user.user_id, item_id = req_payload.item_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequest>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let op = CartOp::Add {
    item_id: req_payload.item_id,
    quantity: req_payload.quantity,
  };
  let (cart, outcome) = run_cart_op(&app_state, &auth_user, op).await?;
  let response = match outcome {
    Some(AddOutcome::Created) => HttpResponse::Created().json(cart),
    _ => HttpResponse::Ok().json(cart),
  };
  Ok(response)
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = auth_user.user_id, item_id = %path.as_ref(), quantity = req_payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  req_payload: web::Json<UpdateQuantityRequest>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let op = CartOp::SetQuantity {
    item_id: path.into_inner(),
    quantity: req_payload.quantity,
  };
  let (cart, _) = run_cart_op(&app_state, &auth_user, op).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, path, auth_user),
    fields(user_id = auth_user.user_id, item_id = %path.as_ref())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let op = CartOp::Remove {
    item_id: path.into_inner(),
  };
  let (cart, _) = run_cart_op(&app_state, &auth_user, op).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let (cart, _) = run_cart_op(&app_state, &auth_user, CartOp::Clear).await?;
  Ok(HttpResponse::Ok().json(cart))
}
