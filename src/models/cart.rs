use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{Cart as DomainCart, CartItem as DomainCartItem};
use crate::domain::types::{CartQuantity, TypeConstraintError};

/// Diesel model representing the `carts` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Cart {
    pub id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart {
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `cart_items` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(belongs_to(Cart))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub added_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub added_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Cart> for DomainCart {
    type Error = TypeConstraintError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        Ok(Self {
            id: cart.id.try_into()?,
            user_id: cart.user_id.try_into()?,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        })
    }
}

impl TryFrom<CartItem> for DomainCartItem {
    type Error = TypeConstraintError;

    fn try_from(item: CartItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id.try_into()?,
            cart_id: item.cart_id.try_into()?,
            product_id: item.product_id.try_into()?,
            quantity: CartQuantity::new(item.quantity)?,
            added_at: item.added_at,
            updated_at: item.updated_at,
        })
    }
}
