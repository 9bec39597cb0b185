// client/src/lib.rs

//! Client side of the shopfront backend: a reqwest gateway that owns the
//! login session, and a cart controller that mirrors the server cart.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;

pub use crate::api::{ApiClient, CartApi};
pub use crate::config::ClientConfig;
pub use crate::controller::{CartController, Notification, NotificationLevel, PendingItems};
pub use crate::error::ClientError;
pub use crate::session::Session;
