//! Domain entities shared by the repository and service layers.

pub mod auth;
pub mod cart;
pub mod category;
pub mod product;
pub mod types;
