// server/src/services/catalog_service.rs

//! Item listing, lookup and creation.

use crate::errors::{AppError, Result};
use crate::models::Item;
use chrono::Utc;
use shopfront_core::wire::{ItemQuery, NewItemRequest};
use shopfront_core::{Money, MoneyError};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{info, instrument};

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 100;

const ITEM_COLUMNS: &str = "id, name, description, price_cents, category, image_url, stock_quantity, created_at";

/// A validated `GET /items` query.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFilter {
  pub search: Option<String>,
  pub category: Option<String>,
  pub min_price: Option<Money>,
  pub max_price: Option<Money>,
  pub skip: u32,
  pub limit: u32,
}

impl TryFrom<&ItemQuery> for ItemFilter {
  type Error = AppError;

  fn try_from(query: &ItemQuery) -> Result<Self> {
    // Bounds round inward so sub-cent limits never admit an item outside them.
    let price = |raw: Option<f64>, name: &str, convert: fn(f64) -> std::result::Result<Money, MoneyError>| -> Result<Option<Money>> {
      raw
        .map(|amount| convert(amount).map_err(|e| AppError::Validation(format!("Invalid {}: {}", name, e))))
        .transpose()
    };
    let min_price = price(query.min_price, "min_price", Money::from_decimal_ceil)?;
    let max_price = price(query.max_price, "max_price", Money::from_decimal_floor)?;
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
      if min > max {
        return Err(AppError::Validation(
          "min_price cannot be greater than max_price".to_string(),
        ));
      }
    }

    let non_blank = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    Ok(Self {
      search: non_blank(&query.search),
      category: non_blank(&query.category),
      min_price,
      max_price,
      skip: query.skip.unwrap_or(0),
      limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
    })
  }
}

/// `%`, `_` and the escape character itself match literally.
fn like_pattern(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len() + 2);
  escaped.push('%');
  for ch in text.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped.push('%');
  escaped
}

#[instrument(name = "catalog_service::list_items", skip(pool), err(Display))]
pub async fn list_items(pool: &SqlitePool, filter: &ItemFilter) -> Result<Vec<Item>> {
  let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT {} FROM items WHERE 1 = 1", ITEM_COLUMNS));

  if let Some(category) = &filter.category {
    qb.push(" AND category = ").push_bind(category.clone());
  }
  if let Some(min) = filter.min_price {
    qb.push(" AND price_cents >= ").push_bind(min.cents());
  }
  if let Some(max) = filter.max_price {
    qb.push(" AND price_cents <= ").push_bind(max.cents());
  }
  if let Some(search) = &filter.search {
    let pattern = like_pattern(search);
    // LIKE folds ASCII case only; other letters must match as typed.
    qb.push(" AND (name LIKE ")
      .push_bind(pattern.clone())
      .push(" ESCAPE '\\' OR COALESCE(description, '') LIKE ")
      .push_bind(pattern)
      .push(" ESCAPE '\\')");
  }
  qb.push(" ORDER BY id ASC LIMIT ")
    .push_bind(i64::from(filter.limit))
    .push(" OFFSET ")
    .push_bind(i64::from(filter.skip));

  let items = qb.build_query_as::<Item>().fetch_all(pool).await?;
  info!(count = items.len(), "Listed catalog items.");
  Ok(items)
}

#[instrument(name = "catalog_service::get_item", skip(pool), err(Display))]
pub async fn get_item(pool: &SqlitePool, item_id: i64) -> Result<Item> {
  sqlx::query_as::<_, Item>(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
    .bind(item_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
}

#[instrument(name = "catalog_service::create_item", skip(pool, req), fields(name = %req.name), err(Display))]
pub async fn create_item(pool: &SqlitePool, req: &NewItemRequest) -> Result<Item> {
  let name = req.name.trim();
  let category = req.category.trim();
  if name.is_empty() {
    return Err(AppError::Validation("Item name is required".to_string()));
  }
  if category.is_empty() {
    return Err(AppError::Validation("Item category is required".to_string()));
  }
  if req.stock_quantity < 0 {
    return Err(AppError::Validation("Stock quantity cannot be negative".to_string()));
  }

  let item = sqlx::query_as::<_, Item>(&format!(
    "INSERT INTO items (name, description, price_cents, category, image_url, stock_quantity, created_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {}",
    ITEM_COLUMNS
  ))
  .bind(name)
  .bind(req.description.as_deref())
  .bind(req.price.cents())
  .bind(category)
  .bind(req.image_url.as_deref())
  .bind(req.stock_quantity)
  .bind(Utc::now())
  .fetch_one(pool)
  .await?;

  info!(item_id = item.id, "Created catalog item.");
  Ok(item)
}

#[instrument(name = "catalog_service::list_categories", skip(pool), err(Display))]
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<String>> {
  let categories =
    sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM items WHERE category <> '' ORDER BY category")
      .fetch_all(pool)
      .await?;
  Ok(categories)
}
