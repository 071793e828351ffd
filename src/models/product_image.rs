use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProductImage as DomainNewProductImage, ProductImage as DomainProductImage,
};
use crate::domain::types::{ImageRef, TypeConstraintError};

/// Diesel model representing the `product_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_images)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub image: String,
    pub alt_text: String,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`ProductImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub image: &'a str,
    pub alt_text: &'a str,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ProductImage> for DomainProductImage {
    type Error = TypeConstraintError;

    fn try_from(image: ProductImage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: image.id.try_into()?,
            product_id: image.product_id.try_into()?,
            image: ImageRef::new(image.image)?,
            alt_text: image.alt_text,
            is_primary: image.is_primary,
            created_at: image.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewProductImage> for NewProductImage<'a> {
    fn from(image: &'a DomainNewProductImage) -> Self {
        Self {
            product_id: image.product_id.get(),
            image: image.image.as_str(),
            alt_text: image.alt_text.as_str(),
            is_primary: image.is_primary,
            created_at: image.created_at,
        }
    }
}
