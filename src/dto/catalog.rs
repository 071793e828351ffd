use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductImage};
use crate::dto::media_path;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub url: String,
}

impl CategoryDto {
    pub fn new(category: &Category, media_url: &str) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.as_str().to_string(),
            slug: category.slug.as_str().to_string(),
            description: category.description.clone(),
            image: category
                .image
                .as_ref()
                .map(|image| media_path(media_url, image)),
            url: format!("/categories/{}", category.slug),
        }
    }
}

/// Product as shown on listing cards and detail pages.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub slug: String,
    pub url: String,
    pub description: String,
    pub price: f64,
    pub discount: f64,
    pub discounted_price: f64,
    pub stock_quantity: i32,
    pub in_stock: bool,
    pub is_featured: bool,
    /// Resolved primary image URL.
    pub image: Option<String>,
}

impl ProductDto {
    /// `gallery` may hold images of several products; only this product's are used.
    pub fn new(product: &Product, gallery: &[ProductImage], media_url: &str) -> Self {
        Self {
            id: product.id.get(),
            category_id: product.category_id.get(),
            name: product.name.as_str().to_string(),
            slug: product.slug.as_str().to_string(),
            url: product.detail_url(),
            description: product.description.clone(),
            price: product.price.get(),
            discount: product.discount.get(),
            discounted_price: product.discounted_price(),
            stock_quantity: product.stock_quantity.get(),
            in_stock: product.is_in_stock(),
            is_featured: product.is_featured,
            image: product
                .primary_image(gallery)
                .map(|image| media_path(media_url, image)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductImageDto {
    pub id: i32,
    pub url: String,
    pub alt_text: String,
    pub is_primary: bool,
}

impl ProductImageDto {
    pub fn new(image: &ProductImage, media_url: &str) -> Self {
        Self {
            id: image.id.get(),
            url: media_path(media_url, &image.image),
            alt_text: image.alt_text.clone(),
            is_primary: image.is_primary,
        }
    }
}

/// Entry of the search-as-you-type suggestion list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductSuggestionDto {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub discounted_price: f64,
    pub image: Option<String>,
    pub url: String,
}

impl From<ProductDto> for ProductSuggestionDto {
    fn from(value: ProductDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price: value.price,
            discounted_price: value.discounted_price,
            image: value.image,
            url: value.url,
        }
    }
}
