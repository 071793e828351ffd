//! Core library exports for the storefront service.
//!
//! The `data` feature exposes the domain, models, schema and repositories.
//! The `server` feature adds forms, services and the actix-web routes.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role required for the `/admin` curation endpoints.
pub const ADMIN_ROLE: &str = "storefront_admin";

/// Featured products shown on the home page.
pub const HOME_FEATURED_PRODUCTS: usize = 8;
/// Categories shown on the home page and in the navigation bar.
pub const HOME_CATEGORIES: usize = 6;
pub const RELATED_PRODUCTS: usize = 4;
pub const SEARCH_SUGGESTIONS: usize = 5;
/// Shortest query that produces search suggestions.
pub const SEARCH_MIN_CHARS: usize = 2;
