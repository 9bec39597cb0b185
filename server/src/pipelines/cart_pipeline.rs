// server/src/pipelines/cart_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::{CartMutationCtxData, CartOp};
use crate::services::cart_service;
use crate::state::AppState;
use shopfront_core::{ContextData, Pipeline, PipelineControl, PipelineRegistry, SkipCondition};
use std::sync::Arc;
use tracing::{debug, info};

/// Registers the pipeline shared by every cart mutation: validate the
/// operation, apply it in the store, then load the resulting cart.
pub fn register_cart_mutation_pipeline(registry: &Arc<PipelineRegistry<AppError>>, _app_state: &AppState) {
  // Only operations that carry a quantity have anything to validate.
  let no_quantity: SkipCondition<CartMutationCtxData> = Arc::new(|ctx_data: ContextData<CartMutationCtxData>| {
    matches!(ctx_data.read().op, CartOp::Remove { .. } | CartOp::Clear)
  });
  let mut cart_p = Pipeline::<CartMutationCtxData, AppError>::new(&[
    ("validate_cart_op", false, Some(no_quantity)),
    ("apply_cart_op", false, None),
    ("load_cart_after_op", false, None),
  ]);

  cart_p.on_root("validate_cart_op", |ctx_data: ContextData<CartMutationCtxData>| {
    Box::pin(async move {
      let op = ctx_data.read().op;
      match op {
        CartOp::Add { quantity, .. } if quantity < 1 => {
          Err(AppError::Validation("Quantity must be greater than 0".to_string()))
        }
        CartOp::SetQuantity { quantity, .. } if quantity < 0 => {
          Err(AppError::Validation("Quantity cannot be negative".to_string()))
        }
        _ => Ok(PipelineControl::Continue),
      }
    })
  });

  cart_p.on_root("apply_cart_op", |ctx_data: ContextData<CartMutationCtxData>| {
    Box::pin(async move {
      let (op, user_id, db_pool) = {
        let guard = ctx_data.read();
        (guard.op, guard.user_id, guard.app_state.db_pool.clone())
      };

      match op {
        CartOp::Add { item_id, quantity } => {
          let outcome = cart_service::add_item(&db_pool, user_id, item_id, quantity).await?;
          info!(user_id, item_id, quantity, outcome = ?outcome, "Item added to cart.");
          ctx_data.write().add_outcome = Some(outcome);
        }
        CartOp::SetQuantity { item_id, quantity } => {
          cart_service::set_quantity(&db_pool, user_id, item_id, quantity).await?;
          info!(user_id, item_id, quantity, "Cart line quantity set.");
        }
        CartOp::Remove { item_id } => {
          let removed = cart_service::remove_item(&db_pool, user_id, item_id).await?;
          debug!(user_id, item_id, removed, "Cart line removal processed.");
        }
        CartOp::Clear => {
          let removed = cart_service::clear(&db_pool, user_id).await?;
          info!(user_id, removed, "Cart cleared.");
        }
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  cart_p.on_root("load_cart_after_op", |ctx_data: ContextData<CartMutationCtxData>| {
    Box::pin(async move {
      let (user_id, db_pool) = {
        let guard = ctx_data.read();
        (guard.user_id, guard.app_state.db_pool.clone())
      };
      let cart = cart_service::load_cart(&db_pool, user_id).await?;
      ctx_data.write().cart = Some(cart);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  registry.register_pipeline(cart_p);
  tracing::info!("Cart mutation pipeline registered.");
}
