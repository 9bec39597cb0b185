// server/src/services/cart_service.rs

//! Per-user cart storage.
//!
//! Each mutation runs in its own transaction whose first statement is a
//! write, so concurrent writers queue on SQLite's write lock instead of
//! racing read-modify-write cycles. Quantity changes are single statements
//! guarded by the stock predicate.

use crate::errors::{AppError, Result};
use crate::models::{Cart, CartLine};
use chrono::Utc;
use shopfront_core::wire::CartView;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, instrument};

const CART_COLUMNS: &str = "id, user_id, created_at, updated_at";

/// Adds `?3` units of item `?2` to cart `?1`. Returns the resulting line
/// quantity, or no row when the item is unknown or stock would be exceeded.
const UPSERT_LINE: &str = r#"
  INSERT INTO cart_items (cart_id, item_id, quantity, added_at)
  SELECT ?1, items.id, ?3, ?4 FROM items WHERE items.id = ?2 AND items.stock_quantity >= ?3
  ON CONFLICT (cart_id, item_id) DO UPDATE
    SET quantity = cart_items.quantity + excluded.quantity
    WHERE cart_items.quantity + excluded.quantity <= (SELECT stock_quantity FROM items WHERE id = excluded.item_id)
  RETURNING quantity
"#;

const SET_LINE_QUANTITY: &str = r#"
  UPDATE cart_items SET quantity = ?1
  WHERE cart_id = ?2 AND item_id = ?3 AND ?1 <= (SELECT stock_quantity FROM items WHERE id = ?3)
  RETURNING id
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
  /// A new line was created.
  Created,
  /// An existing line was incremented.
  Incremented,
}

async fn find_cart(conn: &mut SqliteConnection, user_id: i64) -> Result<Option<Cart>> {
  let cart = sqlx::query_as::<_, Cart>(&format!("SELECT {} FROM carts WHERE user_id = ?", CART_COLUMNS))
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;
  Ok(cart)
}

/// Returns the user's cart, creating it if it does not exist yet.
async fn ensure_cart(conn: &mut SqliteConnection, user_id: i64) -> Result<Cart> {
  let now = Utc::now();
  sqlx::query("INSERT INTO carts (user_id, created_at, updated_at) VALUES (?, ?, ?) ON CONFLICT (user_id) DO NOTHING")
    .bind(user_id)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;
  find_cart(conn, user_id)
    .await?
    .ok_or_else(|| AppError::Internal(format!("Cart for user {} vanished after creation", user_id)))
}

async fn touch(conn: &mut SqliteConnection, cart_id: i64) -> Result<()> {
  sqlx::query("UPDATE carts SET updated_at = ? WHERE id = ?")
    .bind(Utc::now())
    .bind(cart_id)
    .execute(&mut *conn)
    .await?;
  Ok(())
}

/// Explains why a guarded quantity change matched no row.
async fn stock_error(conn: &mut SqliteConnection, item_id: i64) -> Result<AppError> {
  let stock: Option<i64> = sqlx::query_scalar("SELECT stock_quantity FROM items WHERE id = ?")
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?;
  Ok(match stock {
    None => AppError::NotFound("Item not found".to_string()),
    Some(s) if s <= 0 => AppError::OutOfStock("Item is out of stock".to_string()),
    Some(s) => AppError::OutOfStock(format!("Only {} items available in stock", s)),
  })
}

/// The authoritative cart of `user_id`. Never fails for an existing user;
/// an empty cart is valid.
#[instrument(name = "cart_service::load_cart", skip(pool), err(Display))]
pub async fn load_cart(pool: &SqlitePool, user_id: i64) -> Result<CartView> {
  let mut conn = pool.acquire().await?;
  let cart = match find_cart(&mut conn, user_id).await? {
    Some(cart) => cart,
    None => {
      debug!(user_id, "No cart yet, creating one.");
      ensure_cart(&mut conn, user_id).await?
    }
  };

  let lines = sqlx::query_as::<_, CartLine>(
    "SELECT ci.id, ci.item_id, ci.quantity, i.name, i.price_cents, i.image_url \
     FROM cart_items ci JOIN items i ON i.id = ci.item_id \
     WHERE ci.cart_id = ? ORDER BY ci.id",
  )
  .bind(cart.id)
  .fetch_all(&mut *conn)
  .await?;

  Ok(cart.into_view(lines))
}

#[instrument(name = "cart_service::add_item", skip(pool), err(Display))]
pub async fn add_item(pool: &SqlitePool, user_id: i64, item_id: i64, quantity: i64) -> Result<AddOutcome> {
  if quantity < 1 {
    return Err(AppError::Validation("Quantity must be greater than 0".to_string()));
  }

  let mut tx = pool.begin().await?;
  let cart = ensure_cart(&mut tx, user_id).await?;

  let line_quantity: Option<i64> = sqlx::query_scalar(UPSERT_LINE)
    .bind(cart.id)
    .bind(item_id)
    .bind(quantity)
    .bind(Utc::now())
    .fetch_optional(&mut *tx)
    .await?;

  let Some(line_quantity) = line_quantity else {
    let err = stock_error(&mut tx, item_id).await?;
    tx.rollback().await?;
    return Err(err);
  };

  touch(&mut tx, cart.id).await?;
  tx.commit().await?;

  debug!(cart_id = cart.id, line_quantity, "Cart line upserted.");
  // An existing line holds at least one unit, so only a fresh line ends up
  // with exactly the requested quantity.
  Ok(if line_quantity == quantity {
    AddOutcome::Created
  } else {
    AddOutcome::Incremented
  })
}

/// Sets an existing line's quantity; zero deletes the line.
#[instrument(name = "cart_service::set_quantity", skip(pool), err(Display))]
pub async fn set_quantity(pool: &SqlitePool, user_id: i64, item_id: i64, quantity: i64) -> Result<()> {
  if quantity < 0 {
    return Err(AppError::Validation("Quantity cannot be negative".to_string()));
  }

  let mut tx = pool.begin().await?;
  let cart = ensure_cart(&mut tx, user_id).await?;

  if quantity == 0 {
    let deleted = sqlx::query("DELETE FROM cart_items WHERE cart_id = ? AND item_id = ?")
      .bind(cart.id)
      .bind(item_id)
      .execute(&mut *tx)
      .await?
      .rows_affected();
    if deleted == 0 {
      tx.rollback().await?;
      return Err(AppError::ItemNotInCart);
    }
  } else {
    let updated: Option<i64> = sqlx::query_scalar(SET_LINE_QUANTITY)
      .bind(quantity)
      .bind(cart.id)
      .bind(item_id)
      .fetch_optional(&mut *tx)
      .await?;
    if updated.is_none() {
      let has_line: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cart_items WHERE cart_id = ? AND item_id = ?)")
          .bind(cart.id)
          .bind(item_id)
          .fetch_one(&mut *tx)
          .await?;
      let err = if has_line {
        stock_error(&mut tx, item_id).await?
      } else {
        AppError::ItemNotInCart
      };
      tx.rollback().await?;
      return Err(err);
    }
  }

  touch(&mut tx, cart.id).await?;
  tx.commit().await?;
  Ok(())
}

/// Idempotent. Returns whether a line was removed.
#[instrument(name = "cart_service::remove_item", skip(pool), err(Display))]
pub async fn remove_item(pool: &SqlitePool, user_id: i64, item_id: i64) -> Result<bool> {
  let mut tx = pool.begin().await?;
  let cart = ensure_cart(&mut tx, user_id).await?;
  let deleted = sqlx::query("DELETE FROM cart_items WHERE cart_id = ? AND item_id = ?")
    .bind(cart.id)
    .bind(item_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  if deleted > 0 {
    touch(&mut tx, cart.id).await?;
  }
  tx.commit().await?;
  Ok(deleted > 0)
}

/// Idempotent. Returns the number of removed lines.
#[instrument(name = "cart_service::clear", skip(pool), err(Display))]
pub async fn clear(pool: &SqlitePool, user_id: i64) -> Result<u64> {
  let mut tx = pool.begin().await?;
  let cart = ensure_cart(&mut tx, user_id).await?;
  let deleted = sqlx::query("DELETE FROM cart_items WHERE cart_id = ?")
    .bind(cart.id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
  if deleted > 0 {
    touch(&mut tx, cart.id).await?;
  }
  tx.commit().await?;
  Ok(deleted)
}
