use crate::db::{DbConnection, DbPool};
use crate::domain::cart::{Cart, CartItem, CartItemWrite, CartLine};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::product::{NewProduct, NewProductImage, Product, ProductImage, UpdateProduct};
use crate::domain::types::{
    CartId, CartItemId, CartQuantity, CategoryId, ProductId, ProductImageId, ProductPrice,
    ProductSort, UserId,
};
use crate::pagination::Pagination;

pub mod cart;
pub mod category;
pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing or searching products.
///
/// Every filter is optional and filters combine conjunctively.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
    /// Also match the search string against the category name.
    pub search_category_names: bool,
    /// Restrict to the category with this slug.
    pub category_slug: Option<String>,
    pub category_id: Option<CategoryId>,
    /// Inclusive lower price bound.
    pub min_price: Option<ProductPrice>,
    /// Inclusive upper price bound.
    pub max_price: Option<ProductPrice>,
    pub active_only: bool,
    pub featured_only: bool,
    /// Leave this product out of the results.
    pub exclude: Option<ProductId>,
    pub sort: ProductSort,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Listing of products visible to shoppers.
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }
    /// Search name, description and category name.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self.search_category_names = true;
        self
    }
    /// Search name and description only.
    pub fn search_text(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self.search_category_names = false;
        self
    }
    pub fn category_slug(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn price_range(mut self, min: Option<ProductPrice>, max: Option<ProductPrice>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }
    pub fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }
    pub fn exclude(mut self, product_id: ProductId) -> Self {
        self.exclude = Some(product_id);
        self
    }
    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
    /// First `limit` results only.
    pub fn limit(self, limit: usize) -> Self {
        self.paginate(1, limit)
    }
}

/// Query parameters for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List categories ordered by name.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Retrieve a category by its slug.
    fn get_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace the editable fields of a category.
    fn update_category(&self, id: CategoryId, category: &UpdateCategory)
    -> RepositoryResult<usize>;
    /// Delete a category together with its products.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for products and their gallery images.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    ///
    /// Returns the total number of matches before pagination alongside the page.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Number of products matching the query, ignoring its pagination.
    fn count_products(&self, query: &ProductListQuery) -> RepositoryResult<usize>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Retrieve a product by its slug.
    fn get_product_by_slug(&self, slug: &str) -> RepositoryResult<Option<Product>>;
    /// Gallery images of the given products, primary first then by creation.
    fn list_product_images(&self, product_ids: &[ProductId])
    -> RepositoryResult<Vec<ProductImage>>;
}

/// Write operations for products and their gallery images.
pub trait ProductWriter {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, id: ProductId, product: &UpdateProduct) -> RepositoryResult<usize>;
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
    /// Attach a gallery image; a primary image clears the product's other primary flags.
    fn add_product_image(&self, image: &NewProductImage) -> RepositoryResult<ProductImage>;
    /// Flag an image as the product's only primary image.
    ///
    /// Returns the number of images flagged, zero when the image does not
    /// belong to the product.
    fn set_primary_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for carts.
pub trait CartReader {
    fn get_cart_by_user(&self, user_id: UserId) -> RepositoryResult<Option<Cart>>;
    /// Items of a cart joined with their products, most recently added first.
    fn list_cart_lines(&self, cart_id: CartId) -> RepositoryResult<Vec<CartLine>>;
    /// Retrieve an item only if it belongs to `cart_id`.
    fn get_cart_item(
        &self,
        item_id: CartItemId,
        cart_id: CartId,
    ) -> RepositoryResult<Option<CartItem>>;
}

/// Cart mutations. Each call is atomic with respect to the item it touches.
pub trait CartWriter {
    /// Return the user's cart, creating it on first use.
    fn get_or_create_cart(&self, user_id: UserId) -> RepositoryResult<Cart>;
    /// Add `quantity` to the product's item, creating it if needed, then clamp to stock.
    fn add_cart_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: CartQuantity,
    ) -> RepositoryResult<CartItemWrite>;
    /// Set the item's quantity, clamped to stock; a quantity of zero or less deletes it.
    ///
    /// Returns `None` when the cart holds no item for the product.
    fn update_cart_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> RepositoryResult<Option<CartItemWrite>>;
    /// Delete the product's item. Returns `false` if there was none.
    fn remove_cart_item(&self, cart_id: CartId, product_id: ProductId) -> RepositoryResult<bool>;
    /// Delete every item of the cart.
    fn clear_cart(&self, cart_id: CartId) -> RepositoryResult<usize>;
}
