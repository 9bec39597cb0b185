// server/src/pipelines/contexts.rs

//! Data threaded through each pipeline. Handlers receive these wrapped in
//! `shopfront_core::ContextData`.

use crate::models::User;
use crate::services::cart_service::AddOutcome;
use crate::services::token_service::IssuedToken;
use crate::state::AppState;
use shopfront_core::wire::CartView;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub username: String,
  pub password: String,
  pub password_hash: Option<String>,
  pub created_user: Option<User>,
}

impl SignupCtxData {
  pub fn new(app_state: AppState, email: String, username: String, password: String) -> Self {
    Self {
      app_state,
      email,
      username,
      password,
      password_hash: None,
      created_user: None,
    }
  }
}

#[derive(Clone)]
pub struct LoginCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub issued_token: Option<IssuedToken>,
}

impl LoginCtxData {
  pub fn new(app_state: AppState, email: String, password: String) -> Self {
    Self {
      app_state,
      email,
      password,
      user: None,
      issued_token: None,
    }
  }
}

/// One cart mutation requested by an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
  Add { item_id: i64, quantity: i64 },
  SetQuantity { item_id: i64, quantity: i64 },
  Remove { item_id: i64 },
  Clear,
}

impl CartOp {
  pub fn name(&self) -> &'static str {
    match self {
      CartOp::Add { .. } => "add",
      CartOp::SetQuantity { .. } => "set_quantity",
      CartOp::Remove { .. } => "remove",
      CartOp::Clear => "clear",
    }
  }
}

#[derive(Clone)]
pub struct CartMutationCtxData {
  pub app_state: AppState,
  pub user_id: i64,
  pub op: CartOp,
  /// Set by `Add` only.
  pub add_outcome: Option<AddOutcome>,
  /// The cart as stored after the mutation.
  pub cart: Option<CartView>,
}

impl CartMutationCtxData {
  pub fn new(app_state: AppState, user_id: i64, op: CartOp) -> Self {
    Self {
      app_state,
      user_id,
      op,
      add_outcome: None,
      cart: None,
    }
  }
}
