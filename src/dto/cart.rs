use serde::Serialize;

use crate::domain::cart::{CartLine, CartSummary};
use crate::domain::product::ProductImage;
use crate::dto::catalog::ProductDto;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartLineDto {
    pub item_id: i32,
    pub quantity: i32,
    pub product: ProductDto,
    pub total_price: f64,
}

impl CartLineDto {
    pub fn new(line: &CartLine, gallery: &[ProductImage], media_url: &str) -> Self {
        Self {
            item_id: line.item.id.get(),
            quantity: line.item.quantity.get(),
            product: ProductDto::new(&line.product, gallery, media_url),
            total_price: line.total_price(),
        }
    }
}

/// Full cart page data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartDto {
    pub lines: Vec<CartLineDto>,
    pub summary: CartSummary,
}
