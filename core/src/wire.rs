// core/src/wire.rs

//! JSON shapes of the REST surface, shared by the server handlers and the
//! client gateway so both sides agree on field names.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Auth ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
  pub email: String,
  pub password: String,
  pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type: String,
  /// Lifetime of the token in seconds, counted from issuance.
  pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id: i64,
  pub email: String,
  pub username: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
  pub message: String,
}

// --- Catalog ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price: Money,
  pub category: String,
  pub image_url: Option<String>,
  pub stock_quantity: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItemRequest {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: Money,
  pub category: String,
  #[serde(default)]
  pub image_url: Option<String>,
  #[serde(default)]
  pub stock_quantity: i64,
}

/// Query string of `GET /items`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemQuery {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_price: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_price: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub skip: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub limit: Option<u32>,
}

impl ItemQuery {
  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn search(mut self, text: impl Into<String>) -> Self {
    self.search = Some(text.into());
    self
  }

  pub fn price_between(mut self, min: f64, max: f64) -> Self {
    self.min_price = Some(min);
    self.max_price = Some(max);
    self
  }

  pub fn page(mut self, skip: u32, limit: u32) -> Self {
    self.skip = Some(skip);
    self.limit = Some(limit);
    self
  }
}

// --- Cart ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartRequest {
  pub item_id: i64,
  pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
  pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineView {
  /// Id of the cart line row.
  pub id: i64,
  pub item_id: i64,
  pub name: String,
  /// Current catalog price, not the price at the time of adding.
  pub price: Money,
  pub quantity: i64,
  pub image_url: Option<String>,
  pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartView {
  pub id: i64,
  pub user_id: i64,
  pub items: Vec<CartLineView>,
  pub total_items: i64,
  pub total_price: Money,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl CartView {
  pub fn line(&self, item_id: i64) -> Option<&CartLineView> {
    self.items.iter().find(|l| l.item_id == item_id)
  }

  /// Zero when the item has no line.
  pub fn quantity_of(&self, item_id: i64) -> i64 {
    self.line(item_id).map_or(0, |l| l.quantity)
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

// --- Errors ---

/// Stable machine tag carried next to `detail` in error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
  Unauthenticated,
  InvalidCredentials,
  ValidationError,
  NotFound,
  ItemNotInCart,
  OutOfStock,
  InternalError,
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub loc: Vec<serde_json::Value>,
  pub msg: String,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
}

impl FieldIssue {
  pub fn new(field: &str, msg: impl Into<String>) -> Self {
    Self {
      loc: vec!["body".into(), field.into()],
      msg: msg.into(),
      kind: Some("value_error".to_string()),
    }
  }
}

/// `detail` is either a plain message or a list of field-level issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
  Message(String),
  Fields(Vec<FieldIssue>),
}

impl ErrorDetail {
  /// Collapses both shapes into one readable line; field messages are kept
  /// verbatim and joined with `"; "`.
  pub fn to_message(&self) -> String {
    match self {
      ErrorDetail::Message(m) => m.clone(),
      ErrorDetail::Fields(issues) => issues
        .iter()
        .map(|i| i.msg.as_str())
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join("; "),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
  pub detail: ErrorDetail,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code: Option<ErrorCode>,
}

impl ErrorBody {
  pub fn message(code: ErrorCode, message: impl Into<String>) -> Self {
    Self {
      detail: ErrorDetail::Message(message.into()),
      code: Some(code),
    }
  }

  pub fn fields(issues: Vec<FieldIssue>) -> Self {
    Self {
      detail: ErrorDetail::Fields(issues),
      code: Some(ErrorCode::ValidationError),
    }
  }

  /// Parses a non-2xx response body. `None` when the body is not an error
  /// document (empty, HTML from a proxy, ...).
  pub fn parse(raw: &[u8]) -> Option<Self> {
    serde_json::from_slice(raw).ok()
  }
}
