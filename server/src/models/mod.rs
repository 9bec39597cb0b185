// server/src/models/mod.rs

//! Rows of the store's tables.

pub mod cart;
pub mod item;
pub mod user;

pub use cart::{Cart, CartLine};
pub use item::Item;
pub use user::User;
