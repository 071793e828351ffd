pub mod admin;
pub mod cart;
pub mod catalog;
pub mod errors;

pub use errors::{ServiceError, ServiceResult};
