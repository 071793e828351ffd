//! Cart operations behind the `/cart` endpoints.
//!
//! Quantities above the available stock are clamped, never rejected. The
//! returned [`CartOutcome`] tells the caller which limit was applied.

use serde::Serialize;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::cart::{CartLine, CartSummary};
use crate::domain::types::{CartId, CartItemId, UserId};
use crate::dto::cart::{CartDto, CartLineDto};
use crate::forms::cart::{
    AddToCartForm, AddToCartPayload, UpdateCartItemForm, UpdateCartItemPayload,
};
use crate::repository::{CartReader, CartWriter, ProductReader, RepositoryError};

use super::{ServiceError, ServiceResult};

pub const INVALID_PRODUCT_OR_QUANTITY: &str = "Invalid product or quantity.";
pub const INVALID_ITEM_OR_QUANTITY: &str = "Invalid item or quantity.";
pub const ITEM_NOT_FOUND: &str = "Item not found in cart.";
pub const CART_NOT_FOUND: &str = "Cart not found.";
pub const CART_UPDATED: &str = "Cart updated successfully!";
pub const CART_CLEARED: &str = "Cart cleared successfully!";

/// Result of a successful cart mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartOutcome {
    pub message: String,
    /// Stock quantity the request was clamped to, if it was.
    pub stock_limit: Option<i32>,
    /// Item touched by the write; `None` once it is gone.
    pub item_id: Option<i32>,
    pub item_total: f64,
    pub summary: CartSummary,
}

fn current_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    user.user_id().map_err(|e| {
        log::warn!("Rejecting identity with invalid subject: {e}");
        ServiceError::Unauthorized
    })
}

fn internal(context: &'static str) -> impl FnOnce(RepositoryError) -> ServiceError {
    move |e| {
        log::error!("{context}: {e}");
        ServiceError::Internal
    }
}

fn load_lines<R>(repo: &R, cart_id: CartId) -> ServiceResult<Vec<CartLine>>
where
    R: CartReader,
{
    repo.list_cart_lines(cart_id)
        .map_err(internal("Failed to list cart lines"))
}

fn stock_notice(message: &mut String, stock_limit: Option<i32>) {
    if let Some(stock) = stock_limit {
        message.push_str(&format!(" Only {stock} items available in stock."));
    }
}

/// Cart page data. The cart is created on first view.
pub fn show_cart<R>(user: &AuthenticatedUser, repo: &R, media_url: &str) -> ServiceResult<CartDto>
where
    R: CartReader + CartWriter + ProductReader,
{
    let user_id = current_user_id(user)?;
    let cart = repo
        .get_or_create_cart(user_id)
        .map_err(internal("Failed to get or create cart"))?;
    let lines = load_lines(repo, cart.id)?;

    let product_ids: Vec<_> = lines.iter().map(|line| line.product.id).collect();
    let gallery = repo
        .list_product_images(&product_ids)
        .map_err(internal("Failed to list product images"))?;

    Ok(CartDto {
        summary: CartSummary::from_lines(&lines),
        lines: lines
            .iter()
            .map(|line| CartLineDto::new(line, &gallery, media_url))
            .collect(),
    })
}

/// Adds the requested quantity to the user's cart, clamped to stock.
///
/// Inactive or unknown products are [`ServiceError::NotFound`]; a product
/// with no stock left is a form error.
pub fn add_to_cart<R>(
    form: AddToCartForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CartOutcome>
where
    R: ProductReader + CartReader + CartWriter,
{
    let user_id = current_user_id(user)?;
    let payload: AddToCartPayload = form.try_into().map_err(|e| {
        log::debug!("Rejected add to cart form: {e}");
        ServiceError::Form(INVALID_PRODUCT_OR_QUANTITY.to_string())
    })?;

    let product = match repo.get_product_by_id(payload.product_id) {
        Ok(Some(product)) if product.is_active => product,
        Ok(_) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let cart = repo
        .get_or_create_cart(user_id)
        .map_err(internal("Failed to get or create cart"))?;

    let write = match repo.add_cart_item(cart.id, product.id, payload.quantity) {
        Ok(write) => write,
        Err(RepositoryError::NotFound) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to add cart item: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let Some(item) = &write.item else {
        return Err(ServiceError::Form(format!("{} is out of stock.", product.name)));
    };

    let stock_limit = write.was_clamped().then(|| write.stock.get());
    let mut message = format!("{} added to cart!", product.name);
    stock_notice(&mut message, stock_limit);

    let lines = load_lines(repo, cart.id)?;
    Ok(CartOutcome {
        message,
        stock_limit,
        item_id: Some(item.id.get()),
        item_total: product.discounted_price() * f64::from(item.quantity.get()),
        summary: CartSummary::from_lines(&lines),
    })
}

/// Sets the quantity of one of the user's items. Zero or less removes it.
pub fn update_cart_item<R>(
    item_id: i32,
    form: UpdateCartItemForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CartOutcome>
where
    R: CartReader + CartWriter,
{
    let user_id = current_user_id(user)?;
    let item_id = CartItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;
    let payload: UpdateCartItemPayload = form.try_into().map_err(|e| {
        log::debug!("Rejected update cart form: {e}");
        ServiceError::Form(INVALID_ITEM_OR_QUANTITY.to_string())
    })?;

    let cart = match repo.get_cart_by_user(user_id) {
        Ok(Some(cart)) => cart,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get cart: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let item = match repo.get_cart_item(item_id, cart.id) {
        Ok(Some(item)) => item,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get cart item: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let write = match repo.update_cart_item_quantity(cart.id, item.product_id, payload.quantity) {
        Ok(Some(write)) => write,
        Ok(None) | Err(RepositoryError::NotFound) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update cart item: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let stock_limit = write.was_clamped().then(|| write.stock.get());
    let mut message = CART_UPDATED.to_string();
    stock_notice(&mut message, stock_limit);

    let lines = load_lines(repo, cart.id)?;
    let item_total = lines
        .iter()
        .find(|line| line.item.id == item.id)
        .map_or(0.0, CartLine::total_price);

    Ok(CartOutcome {
        message,
        stock_limit,
        item_id: write.item.map(|i| i.id.get()),
        item_total,
        summary: CartSummary::from_lines(&lines),
    })
}

/// Removes one of the user's items.
pub fn remove_cart_item<R>(
    item_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CartOutcome>
where
    R: CartReader + CartWriter + ProductReader,
{
    let user_id = current_user_id(user)?;
    let item_id = CartItemId::new(item_id).map_err(|_| ServiceError::NotFound)?;

    let cart = match repo.get_cart_by_user(user_id) {
        Ok(Some(cart)) => cart,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get cart: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let item = match repo.get_cart_item(item_id, cart.id) {
        Ok(Some(item)) => item,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get cart item: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let product_name = repo
        .get_product_by_id(item.product_id)
        .map_err(internal("Failed to get product"))?
        .map(|product| product.name.into_inner())
        .unwrap_or_else(|| "Item".to_string());

    let removed = repo
        .remove_cart_item(cart.id, item.product_id)
        .map_err(internal("Failed to remove cart item"))?;
    if !removed {
        return Err(ServiceError::NotFound);
    }

    let lines = load_lines(repo, cart.id)?;
    Ok(CartOutcome {
        message: format!("{product_name} removed from cart."),
        stock_limit: None,
        item_id: None,
        item_total: 0.0,
        summary: CartSummary::from_lines(&lines),
    })
}

/// Empties the user's cart. A user without a cart gets `NotFound`.
pub fn clear_cart<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<CartOutcome>
where
    R: CartReader + CartWriter,
{
    let user_id = current_user_id(user)?;

    let cart = match repo.get_cart_by_user(user_id) {
        Ok(Some(cart)) => cart,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get cart: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let removed = repo
        .clear_cart(cart.id)
        .map_err(internal("Failed to clear cart"))?;
    log::info!("Cleared {removed} items from cart {}", cart.id);

    Ok(CartOutcome {
        message: CART_CLEARED.to_string(),
        stock_limit: None,
        item_id: None,
        item_total: 0.0,
        summary: CartSummary::default(),
    })
}

/// Totals of the user's cart, zero for anonymous users and users without a cart.
pub fn cart_summary<R>(user: Option<&AuthenticatedUser>, repo: &R) -> ServiceResult<CartSummary>
where
    R: CartReader,
{
    let Some(user_id) = user.and_then(|u| u.user_id().ok()) else {
        return Ok(CartSummary::default());
    };

    match repo.get_cart_by_user(user_id) {
        Ok(Some(cart)) => Ok(CartSummary::from_lines(&load_lines(repo, cart.id)?)),
        Ok(None) => Ok(CartSummary::default()),
        Err(e) => {
            log::error!("Failed to get cart: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Number of units in the user's cart.
pub fn cart_count<R>(user: Option<&AuthenticatedUser>, repo: &R) -> ServiceResult<i32>
where
    R: CartReader,
{
    cart_summary(user, repo).map(|summary| summary.total_items)
}
