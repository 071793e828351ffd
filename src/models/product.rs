use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct,
    UpdateProduct as DomainUpdateProduct,
};
use crate::domain::types::{
    DiscountPercent, ImageRef, ProductName, ProductPrice, Slug, StockQuantity,
    TypeConstraintError,
};

/// Diesel model representing a row in the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub stock_quantity: i32,
    pub image: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`] used for creating new rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub category_id: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub discount: f64,
    pub stock_quantity: i32,
    pub image: Option<&'a str>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset applied by product edits.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangeset<'a> {
    pub category_id: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub discount: f64,
    pub stock_quantity: i32,
    pub image: Option<&'a str>,
    pub is_active: bool,
    pub is_featured: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            category_id: product.category_id.try_into()?,
            name: ProductName::new(product.name)?,
            slug: Slug::new(product.slug)?,
            description: product.description,
            price: ProductPrice::new(product.price)?,
            discount: DiscountPercent::new(product.discount)?,
            stock_quantity: StockQuantity::new(product.stock_quantity)?,
            image: product.image.map(ImageRef::new).transpose()?,
            is_active: product.is_active,
            is_featured: product.is_featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(product: &'a DomainNewProduct) -> Self {
        Self {
            category_id: product.category_id.get(),
            name: product.name.as_str(),
            slug: product.slug.as_str(),
            description: product.description.as_str(),
            price: product.price.get(),
            discount: product.discount.get(),
            stock_quantity: product.stock_quantity.get(),
            image: product.image.as_ref().map(ImageRef::as_str),
            is_active: product.is_active,
            is_featured: product.is_featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl<'a> ProductChangeset<'a> {
    pub fn new(product: &'a DomainUpdateProduct, updated_at: NaiveDateTime) -> Self {
        Self {
            category_id: product.category_id.get(),
            name: product.name.as_str(),
            slug: product.slug.as_str(),
            description: product.description.as_str(),
            price: product.price.get(),
            discount: product.discount.get(),
            stock_quantity: product.stock_quantity.get(),
            image: product.image.as_ref().map(ImageRef::as_str),
            is_active: product.is_active,
            is_featured: product.is_featured,
            updated_at,
        }
    }
}
