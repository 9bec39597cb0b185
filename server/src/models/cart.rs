// server/src/models/cart.rs

use chrono::{DateTime, Utc};
use shopfront_core::wire::{CartLineView, CartView};
use shopfront_core::Money;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Cart {
  pub id: i64,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A cart line joined with the item it refers to.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
  pub id: i64,
  pub item_id: i64,
  pub quantity: i64,
  pub name: String,
  pub price_cents: i64,
  pub image_url: Option<String>,
}

impl CartLine {
  pub fn line_total(&self) -> Money {
    Money::from_cents(self.price_cents).times(self.quantity)
  }
}

impl Cart {
  /// Totals are always derived from the current item prices.
  pub fn into_view(self, lines: Vec<CartLine>) -> CartView {
    let items: Vec<CartLineView> = lines
      .into_iter()
      .map(|line| CartLineView {
        id: line.id,
        item_id: line.item_id,
        line_total: line.line_total(),
        price: Money::from_cents(line.price_cents),
        quantity: line.quantity,
        name: line.name,
        image_url: line.image_url,
      })
      .collect();

    CartView {
      id: self.id,
      user_id: self.user_id,
      total_items: items.iter().map(|l| l.quantity).sum(),
      total_price: items.iter().map(|l| l.line_total).sum(),
      items,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn view_totals_follow_line_prices() {
    let now = Utc::now();
    let cart = Cart { id: 1, user_id: 7, created_at: now, updated_at: now };
    let lines = vec![
      CartLine { id: 10, item_id: 3, quantity: 2, name: "Cotton T-Shirt".into(), price_cents: 1999, image_url: None },
      CartLine { id: 11, item_id: 6, quantity: 1, name: "Yoga Mat".into(), price_cents: 3999, image_url: None },
    ];
    let view = cart.into_view(lines);
    assert_eq!(view.total_items, 3);
    assert_eq!(view.total_price.cents(), 2 * 1999 + 3999);
    assert_eq!(view.items[0].line_total.cents(), 3998);
  }

  #[test]
  fn empty_cart_has_zero_totals() {
    let now = Utc::now();
    let view = Cart { id: 1, user_id: 1, created_at: now, updated_at: now }.into_view(Vec::new());
    assert!(view.is_empty());
    assert_eq!(view.total_items, 0);
    assert_eq!(view.total_price, Money::ZERO);
  }
}
