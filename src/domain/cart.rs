use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::types::{CartId, CartItemId, CartQuantity, ProductId, StockQuantity, UserId};

/// Shopping cart owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Quantity of a single product held in a cart.
///
/// Unique per `(cart_id, product_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: CartQuantity,
    pub added_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A cart item joined with the product it references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Product,
}

impl CartLine {
    /// Discounted unit price times quantity.
    pub fn total_price(&self) -> f64 {
        self.product.discounted_price() * f64::from(self.item.quantity.get())
    }
}

/// Totals derived from the current cart lines. Never persisted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    pub total_items: i32,
    pub total_price: f64,
}

impl CartSummary {
    pub fn from_lines(lines: &[CartLine]) -> Self {
        lines.iter().fold(Self::default(), |acc, line| Self {
            total_items: acc.total_items + line.item.quantity.get(),
            total_price: acc.total_price + line.total_price(),
        })
    }
}

/// Quantity to persist for a requested amount given the current stock.
///
/// Requests above stock are clamped rather than rejected. `None` means the
/// row must not exist: either the request was not positive or nothing is
/// left in stock.
pub fn clamp_to_stock(requested: i32, stock: StockQuantity) -> Option<CartQuantity> {
    if requested <= 0 {
        return None;
    }
    CartQuantity::new(requested.min(stock.get())).ok()
}

/// Outcome of a cart write, reporting both the requested and stored amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemWrite {
    /// Quantity the write asked for, after adding to any existing amount.
    pub requested: i32,
    /// Stock of the product at the time of the write.
    pub stock: StockQuantity,
    /// Persisted row, or `None` when the item was removed or never stored.
    pub item: Option<CartItem>,
}

impl CartItemWrite {
    /// Stored quantity, zero when no row remains.
    pub fn stored(&self) -> i32 {
        self.item.as_ref().map_or(0, |i| i.quantity.get())
    }

    /// True when the stock limit reduced the requested quantity.
    pub fn was_clamped(&self) -> bool {
        self.requested > 0 && self.stored() < self.requested
    }
}
