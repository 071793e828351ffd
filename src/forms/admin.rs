use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::domain::product::{NewProduct, NewProductImage, UpdateProduct};
use crate::domain::types::{
    CategoryId, CategoryName, DiscountPercent, ImageRef, ProductId, ProductName, ProductPrice,
    Slug, StockQuantity, TypeConstraintError,
};

/// HTML checkboxes submit `on` when ticked and nothing otherwise.
fn checkbox(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("on" | "true" | "1"))
}

fn optional_image(value: Option<String>) -> Result<Option<ImageRef>, TypeConstraintError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(image) => ImageRef::new(image).map(Some),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
    pub slug: Slug,
    pub description: String,
    pub image: Option<ImageRef>,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            slug: self.slug,
            description: self.description,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> UpdateCategory {
        UpdateCategory {
            name: self.name,
            slug: self.slug,
            description: self.description,
            image: self.image,
        }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let name = CategoryName::new(value.name)?;
        let slug = Slug::or_from_name(value.slug.as_deref(), &name)?;

        Ok(Self {
            name,
            slug,
            description: value.description.unwrap_or_default().trim().to_string(),
            image: optional_image(value.image)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    pub image: Option<String>,
    pub is_active: Option<String>,
    pub is_featured: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub category_id: CategoryId,
    pub name: ProductName,
    pub slug: Slug,
    pub description: String,
    pub price: ProductPrice,
    pub discount: DiscountPercent,
    pub stock_quantity: StockQuantity,
    pub image: Option<ImageRef>,
    pub is_active: bool,
    pub is_featured: bool,
}

impl ProductFormPayload {
    pub fn into_new_product(self) -> NewProduct {
        let now = Utc::now().naive_utc();
        NewProduct {
            category_id: self.category_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            discount: self.discount,
            stock_quantity: self.stock_quantity,
            image: self.image,
            is_active: self.is_active,
            is_featured: self.is_featured,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_update(self) -> UpdateProduct {
        UpdateProduct {
            category_id: self.category_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            discount: self.discount,
            stock_quantity: self.stock_quantity,
            image: self.image,
            is_active: self.is_active,
            is_featured: self.is_featured,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let name = ProductName::new(value.name)?;
        let slug = Slug::or_from_name(value.slug.as_deref(), &name)?;

        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
            name,
            slug,
            description: value.description.unwrap_or_default().trim().to_string(),
            price: ProductPrice::new(value.price)?,
            discount: DiscountPercent::new(value.discount.unwrap_or(0.0))?,
            stock_quantity: StockQuantity::new(value.stock_quantity)?,
            image: optional_image(value.image)?,
            is_active: checkbox(value.is_active.as_deref()),
            is_featured: checkbox(value.is_featured.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductImageForm {
    #[validate(length(min = 1, max = 255))]
    pub image: String,
    #[validate(length(max = 200))]
    pub alt_text: Option<String>,
    pub is_primary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductImageFormPayload {
    pub image: ImageRef,
    pub alt_text: String,
    pub is_primary: bool,
}

impl ProductImageFormPayload {
    pub fn into_new_image(self, product_id: ProductId) -> NewProductImage {
        NewProductImage {
            product_id,
            image: self.image,
            alt_text: self.alt_text,
            is_primary: self.is_primary,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductImageFormError {
    #[error("Product image form validation failed: {0}")]
    Validation(String),
    #[error("Product image form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProductImageFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductImageFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProductImageForm> for ProductImageFormPayload {
    type Error = ProductImageFormError;

    fn try_from(value: ProductImageForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            image: ImageRef::new(value.image)?,
            alt_text: value.alt_text.unwrap_or_default().trim().to_string(),
            is_primary: checkbox(value.is_primary.as_deref()),
        })
    }
}
