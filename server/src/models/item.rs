// server/src/models/item.rs

use chrono::{DateTime, Utc};
use shopfront_core::wire::ItemView;
use shopfront_core::Money;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Item {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub category: String,
  pub image_url: Option<String>,
  pub stock_quantity: i64,
  pub created_at: DateTime<Utc>,
}

impl Item {
  pub fn price(&self) -> Money {
    Money::from_cents(self.price_cents)
  }

  pub fn view(&self) -> ItemView {
    ItemView {
      id: self.id,
      name: self.name.clone(),
      description: self.description.clone(),
      price: self.price(),
      category: self.category.clone(),
      image_url: self.image_url.clone(),
      stock_quantity: self.stock_quantity,
      created_at: self.created_at,
    }
  }
}

impl From<Item> for ItemView {
  fn from(item: Item) -> Self {
    item.view()
  }
}
