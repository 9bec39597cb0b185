// server/src/services/mod.rs

//! Store access and credential handling used by the pipelines and handlers.

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod token_service;
pub mod user_service;

pub use token_service::{Claims, TokenError, TokenService};
