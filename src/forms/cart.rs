use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{CartQuantity, ProductId, TypeConstraintError};

fn parse_int(value: &str, field: &str) -> Result<i32, TypeConstraintError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| TypeConstraintError::InvalidValue(format!("{field} must be an integer")))
}

/// Body of `POST /cart/add`.
///
/// Numbers arrive as text so that malformed input becomes a form error
/// instead of a rejected request.
#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub product_id: String,
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddToCartPayload {
    pub product_id: ProductId,
    pub quantity: CartQuantity,
}

#[derive(Debug, Error)]
pub enum AddToCartFormError {
    #[error("Add to cart form validation failed: {0}")]
    Validation(String),
    #[error("Add to cart form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddToCartFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddToCartFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddToCartForm> for AddToCartPayload {
    type Error = AddToCartFormError;

    fn try_from(value: AddToCartForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let quantity = match value.quantity.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => parse_int(raw, "quantity")?,
        };

        Ok(Self {
            product_id: ProductId::new(parse_int(&value.product_id, "product_id")?)?,
            quantity: CartQuantity::new(quantity)?,
        })
    }
}

/// Body of `POST /cart/update/{item_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartItemForm {
    pub quantity: Option<String>,
}

/// Requested quantity for an existing item; zero or less removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCartItemPayload {
    pub quantity: i32,
}

#[derive(Debug, Error)]
pub enum UpdateCartItemFormError {
    #[error("Update cart form validation failed: {0}")]
    Validation(String),
    #[error("Update cart form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateCartItemFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateCartItemFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateCartItemForm> for UpdateCartItemPayload {
    type Error = UpdateCartItemFormError;

    fn try_from(value: UpdateCartItemForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let quantity = match value.quantity.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => parse_int(raw, "quantity")?,
        };
        Ok(Self { quantity })
    }
}
