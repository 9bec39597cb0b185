// server/src/db/seed.rs

use crate::errors::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

struct SeedItem {
  name: &'static str,
  description: &'static str,
  price_cents: i64,
  category: &'static str,
  image_url: &'static str,
  stock_quantity: i64,
}

const SAMPLE_ITEMS: &[SeedItem] = &[
  SeedItem {
    name: "Wireless Bluetooth Headphones",
    description: "High-quality wireless headphones with noise cancellation and 30-hour battery life.",
    price_cents: 19999,
    category: "Electronics",
    image_url: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=300&h=200&fit=crop",
    stock_quantity: 50,
  },
  SeedItem {
    name: "Smartphone Case",
    description: "Durable protective case for smartphones with shock absorption.",
    price_cents: 2499,
    category: "Electronics",
    image_url: "https://images.unsplash.com/photo-1556656793-08538906a9f8?w=300&h=200&fit=crop",
    stock_quantity: 100,
  },
  SeedItem {
    name: "Cotton T-Shirt",
    description: "Comfortable 100% cotton t-shirt available in multiple colors.",
    price_cents: 1999,
    category: "Clothing",
    image_url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=300&h=200&fit=crop",
    stock_quantity: 75,
  },
  SeedItem {
    name: "Denim Jeans",
    description: "Classic fit denim jeans made from premium quality fabric.",
    price_cents: 7999,
    category: "Clothing",
    image_url: "https://images.unsplash.com/photo-1542272604-787c3835535d?w=300&h=200&fit=crop",
    stock_quantity: 40,
  },
  SeedItem {
    name: "Running Shoes",
    description: "Lightweight running shoes with excellent cushioning and support.",
    price_cents: 12999,
    category: "Sports",
    image_url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=300&h=200&fit=crop",
    stock_quantity: 60,
  },
  SeedItem {
    name: "Yoga Mat",
    description: "Non-slip yoga mat perfect for all types of workouts and meditation.",
    price_cents: 3999,
    category: "Sports",
    image_url: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=300&h=200&fit=crop",
    stock_quantity: 30,
  },
  SeedItem {
    name: "Coffee Maker",
    description: "Programmable coffee maker with 12-cup capacity and auto-shutoff feature.",
    price_cents: 8999,
    category: "Home",
    image_url: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=300&h=200&fit=crop",
    stock_quantity: 25,
  },
  SeedItem {
    name: "Desk Lamp",
    description: "Adjustable LED desk lamp with multiple brightness settings and USB charging port.",
    price_cents: 4999,
    category: "Home",
    image_url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=300&h=200&fit=crop",
    stock_quantity: 45,
  },
  SeedItem {
    name: "Backpack",
    description: "Durable travel backpack with multiple compartments and laptop sleeve.",
    price_cents: 6999,
    category: "Accessories",
    image_url: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=300&h=200&fit=crop",
    stock_quantity: 35,
  },
  SeedItem {
    name: "Sunglasses",
    description: "Stylish sunglasses with UV protection and polarized lenses.",
    price_cents: 5999,
    category: "Accessories",
    image_url: "https://images.unsplash.com/photo-1572635196237-14b3f281503f?w=300&h=200&fit=crop",
    stock_quantity: 80,
  },
];

/// Inserts the sample catalog unless the items table already has rows.
/// Returns the number of inserted items.
#[instrument(name = "db::seed_catalog", skip(pool), err(Display))]
pub async fn seed_catalog(pool: &SqlitePool) -> Result<usize> {
  let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items").fetch_one(pool).await?;
  if existing > 0 {
    info!(existing, "Catalog already populated, skipping seed.");
    return Ok(0);
  }

  let mut tx = pool.begin().await?;
  let now = Utc::now();
  for item in SAMPLE_ITEMS {
    sqlx::query(
      "INSERT INTO items (name, description, price_cents, category, image_url, stock_quantity, created_at) \
       VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.name)
    .bind(item.description)
    .bind(item.price_cents)
    .bind(item.category)
    .bind(item.image_url)
    .bind(item.stock_quantity)
    .bind(now)
    .execute(&mut *tx)
    .await?;
  }
  tx.commit().await?;

  info!(count = SAMPLE_ITEMS.len(), "Seeded sample catalog.");
  Ok(SAMPLE_ITEMS.len())
}
