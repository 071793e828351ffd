//! Diesel row types and their conversions into domain entities.

pub mod cart;
pub mod category;
pub mod product;
pub mod product_image;

#[cfg(feature = "server")]
pub mod config;
