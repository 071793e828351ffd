use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, DiscountPercent, ImageRef, ProductId, ProductImageId, ProductName, ProductPrice,
    Slug, StockQuantity,
};

/// A product offered in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: ProductName,
    pub slug: Slug,
    pub description: String,
    pub price: ProductPrice,
    pub discount: DiscountPercent,
    pub stock_quantity: StockQuantity,
    /// Image stored directly on the product; preferred over gallery images.
    pub image: Option<ImageRef>,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Price after the percentage discount is applied.
    pub fn discounted_price(&self) -> f64 {
        discounted_price(self.price, self.discount)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity.get() > 0
    }

    /// Picks the image that represents this product.
    ///
    /// Order of preference: the product's own image, the gallery image
    /// flagged primary, then the first gallery image.
    pub fn primary_image<'a>(&'a self, gallery: &'a [ProductImage]) -> Option<&'a ImageRef> {
        if let Some(image) = &self.image {
            return Some(image);
        }
        let gallery = gallery.iter().filter(|i| i.product_id == self.id);
        let mut first = None;
        for image in gallery {
            if image.is_primary {
                return Some(&image.image);
            }
            first.get_or_insert(&image.image);
        }
        first
    }

    /// Relative URL of the product detail page.
    pub fn detail_url(&self) -> String {
        format!("/products/{}", self.slug)
    }
}

/// `price × (1 − discount / 100)`; a zero discount returns the price unchanged.
pub fn discounted_price(price: ProductPrice, discount: DiscountPercent) -> f64 {
    if discount.get() > 0.0 {
        price.get() * (1.0 - discount.get() / 100.0)
    } else {
        price.get()
    }
}

/// Information required to create a new [`Product`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Replacement values applied when editing a [`Product`].
#[derive(Debug, PartialEq, Clone)]
pub struct UpdateProduct {
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

/// Additional gallery image attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image: ImageRef,
    pub alt_text: String,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to attach a new [`ProductImage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProductImage {
    pub product_id: ProductId,
    pub image: ImageRef,
    pub alt_text: String,
    pub is_primary: bool,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn sample_product(price: f64, discount: f64) -> Product {
        Product {
            id: ProductId::new(1).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
            name: ProductName::new("Denim Jacket").unwrap(),
            slug: Slug::new("denim-jacket").unwrap(),
            description: String::new(),
            price: ProductPrice::new(price).unwrap(),
            discount: DiscountPercent::new(discount).unwrap(),
            stock_quantity: StockQuantity::new(3).unwrap(),
            image: None,
            is_active: true,
            is_featured: false,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn gallery_image(id: i32, path: &str, is_primary: bool) -> ProductImage {
        ProductImage {
            id: ProductImageId::new(id).unwrap(),
            product_id: ProductId::new(1).unwrap(),
            image: ImageRef::new(path).unwrap(),
            alt_text: String::new(),
            is_primary,
            created_at: DateTime::from_timestamp(id as i64, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn discounted_price_applies_percentage() {
        let product = sample_product(80.0, 25.0);
        assert!((product.discounted_price() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn zero_discount_keeps_price() {
        for price in [0.0, 19.99, 149.99, 1234.5] {
            let product = sample_product(price, 0.0);
            assert_eq!(product.discounted_price(), price);
        }
    }

    #[test]
    fn full_discount_is_free() {
        assert_eq!(sample_product(42.0, 100.0).discounted_price(), 0.0);
    }

    #[test]
    fn primary_image_prefers_product_image() {
        let mut product = sample_product(10.0, 0.0);
        product.image = Some(ImageRef::new("products/own.jpg").unwrap());
        let gallery = vec![gallery_image(1, "products/gallery/a.jpg", true)];
        assert_eq!(
            product.primary_image(&gallery).unwrap().as_str(),
            "products/own.jpg"
        );
    }

    #[test]
    fn primary_image_falls_back_to_flagged_then_first() {
        let product = sample_product(10.0, 0.0);
        let gallery = vec![
            gallery_image(1, "products/gallery/a.jpg", false),
            gallery_image(2, "products/gallery/b.jpg", true),
        ];
        assert_eq!(
            product.primary_image(&gallery).unwrap().as_str(),
            "products/gallery/b.jpg"
        );

        let gallery = vec![gallery_image(1, "products/gallery/a.jpg", false)];
        assert_eq!(
            product.primary_image(&gallery).unwrap().as_str(),
            "products/gallery/a.jpg"
        );
        assert!(product.primary_image(&[]).is_none());
    }

    #[test]
    fn out_of_stock_when_quantity_is_zero() {
        let mut product = sample_product(10.0, 0.0);
        assert!(product.is_in_stock());
        product.stock_quantity = StockQuantity::new(0).unwrap();
        assert!(!product.is_in_stock());
    }
}
