use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime};

use crate::domain::cart::{Cart, CartItem, CartItemWrite, CartLine, clamp_to_stock};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::product::{NewProduct, NewProductImage, Product, ProductImage, UpdateProduct};
use crate::domain::types::{
    CartId, CartItemId, CartQuantity, CategoryId, ProductId, ProductImageId, ProductSort, UserId,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CartReader, CartWriter, CategoryListQuery, CategoryReader, CategoryWriter, ProductListQuery,
    ProductReader, ProductWriter,
};

#[derive(Default)]
struct TestState {
    categories: Vec<Category>,
    products: Vec<Product>,
    images: Vec<ProductImage>,
    carts: Vec<Cart>,
    items: Vec<CartItem>,
    next_id: i32,
}

impl TestState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    state: Mutex<TestState>,
}

fn epoch() -> NaiveDateTime {
    DateTime::from_timestamp(0, 0).unwrap().naive_utc()
}

impl TestRepository {
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            state: Mutex::new(TestState {
                categories,
                products,
                next_id: 1000,
                ..TestState::default()
            }),
        }
    }

    pub fn with_images(self, images: Vec<ProductImage>) -> Self {
        self.state.lock().unwrap().images = images;
        self
    }

    /// Overwrite a product's stock, as an admin edit would.
    pub fn set_stock(&self, product_id: ProductId, stock: i32) {
        let mut state = self.state.lock().unwrap();
        if let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) {
            product.stock_quantity = stock.try_into().unwrap();
        }
    }

    pub fn images(&self) -> Vec<ProductImage> {
        self.state.lock().unwrap().images.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.lock().unwrap().products.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }

    fn write_quantity(
        state: &mut TestState,
        cart_id: CartId,
        product_id: ProductId,
        requested: i32,
    ) -> RepositoryResult<CartItemWrite> {
        let stock = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.stock_quantity)
            .ok_or(RepositoryError::NotFound)?;
        let position = state
            .items
            .iter()
            .position(|i| i.cart_id == cart_id && i.product_id == product_id);

        let item = match (clamp_to_stock(requested, stock), position) {
            (None, Some(index)) => {
                state.items.remove(index);
                None
            }
            (None, None) => None,
            (Some(quantity), Some(index)) => {
                state.items[index].quantity = quantity;
                Some(state.items[index].clone())
            }
            (Some(quantity), None) => {
                let id = state.next_id();
                let item = CartItem {
                    id: CartItemId::new(id)?,
                    cart_id,
                    product_id,
                    quantity,
                    added_at: DateTime::from_timestamp(i64::from(id), 0)
                        .unwrap()
                        .naive_utc(),
                    updated_at: epoch(),
                };
                state.items.push(item.clone());
                Some(item)
            }
        };

        Ok(CartItemWrite {
            requested,
            stock,
            item,
        })
    }
}

fn matches_query(product: &Product, query: &ProductListQuery, categories: &[Category]) -> bool {
    let category = categories.iter().find(|c| c.id == product.category_id);
    if query.active_only && !product.is_active {
        return false;
    }
    if query.featured_only && !product.is_featured {
        return false;
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let search = search.to_lowercase();
        let in_text = product.name.to_lowercase().contains(&search)
            || product.description.to_lowercase().contains(&search);
        let in_category = query.search_category_names
            && category.is_some_and(|c| c.name.to_lowercase().contains(&search));
        if !in_text && !in_category {
            return false;
        }
    }
    if let Some(slug) = &query.category_slug {
        if !category.is_some_and(|c| c.slug.as_str() == slug) {
            return false;
        }
    }
    if query.category_id.is_some_and(|id| id != product.category_id) {
        return false;
    }
    if query.min_price.is_some_and(|min| product.price < min) {
        return false;
    }
    if query.max_price.is_some_and(|max| product.price > max) {
        return false;
    }
    if query.exclude == Some(product.id) {
        return false;
    }
    true
}

impl CategoryReader for TestRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        let mut items = self.categories();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.categories().into_iter().find(|c| c.id == id))
    }

    fn get_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>> {
        Ok(self
            .categories()
            .into_iter()
            .find(|c| c.slug.as_str() == slug))
    }
}

impl CategoryWriter for TestRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        let mut state = self.state.lock().unwrap();
        if state
            .categories
            .iter()
            .any(|c| c.name == category.name || c.slug == category.slug)
        {
            return Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed: categories".into(),
            ));
        }
        let id = state.next_id();
        let created = Category {
            id: CategoryId::new(id)?,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        };
        state.categories.push(created.clone());
        Ok(created)
    }

    fn update_category(
        &self,
        id: CategoryId,
        category: &UpdateCategory,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.categories.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                existing.name = category.name.clone();
                existing.slug = category.slug.clone();
                existing.description = category.description.clone();
                existing.image = category.image.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        state.products.retain(|p| p.category_id != id);
        Ok(before - state.categories.len())
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<Product> = state
            .products
            .iter()
            .filter(|p| matches_query(p, &query, &state.categories))
            .cloned()
            .collect();

        items.sort_by(|a, b| {
            let primary = match query.sort {
                ProductSort::Newest => b.created_at.cmp(&a.created_at),
                ProductSort::PriceLow => a.price.get().total_cmp(&b.price.get()),
                ProductSort::PriceHigh => b.price.get().total_cmp(&a.price.get()),
                ProductSort::Name => a.name.cmp(&b.name),
                ProductSort::Discount => b.discount.get().total_cmp(&a.discount.get()),
            };
            primary.then_with(|| b.id.cmp(&a.id))
        });

        let total = items.len();
        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn count_products(&self, query: &ProductListQuery) -> RepositoryResult<usize> {
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .filter(|p| matches_query(p, query, &state.categories))
            .count())
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self.products().into_iter().find(|p| p.id == id))
    }

    fn get_product_by_slug(&self, slug: &str) -> RepositoryResult<Option<Product>> {
        Ok(self
            .products()
            .into_iter()
            .find(|p| p.slug.as_str() == slug))
    }

    fn list_product_images(
        &self,
        product_ids: &[ProductId],
    ) -> RepositoryResult<Vec<ProductImage>> {
        let mut images: Vec<ProductImage> = self
            .images()
            .into_iter()
            .filter(|i| product_ids.contains(&i.product_id))
            .collect();
        images.sort_by(|a, b| {
            b.is_primary
                .cmp(&a.is_primary)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(images)
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut state = self.state.lock().unwrap();
        if state.products.iter().any(|p| p.slug == product.slug) {
            return Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed: products.slug".into(),
            ));
        }
        let id = state.next_id();
        let created = Product {
            id: ProductId::new(id)?,
            category_id: product.category_id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            discount: product.discount,
            stock_quantity: product.stock_quantity,
            image: product.image.clone(),
            is_active: product.is_active,
            is_featured: product.is_featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    fn update_product(&self, id: ProductId, product: &UpdateProduct) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        match state.products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                existing.category_id = product.category_id;
                existing.name = product.name.clone();
                existing.slug = product.slug.clone();
                existing.description = product.description.clone();
                existing.price = product.price;
                existing.discount = product.discount;
                existing.stock_quantity = product.stock_quantity;
                existing.image = product.image.clone();
                existing.is_active = product.is_active;
                existing.is_featured = product.is_featured;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        state.images.retain(|i| i.product_id != id);
        state.items.retain(|i| i.product_id != id);
        Ok(before - state.products.len())
    }

    fn add_product_image(&self, image: &NewProductImage) -> RepositoryResult<ProductImage> {
        let mut state = self.state.lock().unwrap();
        if image.is_primary {
            for existing in state
                .images
                .iter_mut()
                .filter(|i| i.product_id == image.product_id)
            {
                existing.is_primary = false;
            }
        }
        let id = state.next_id();
        let created = ProductImage {
            id: ProductImageId::new(id)?,
            product_id: image.product_id,
            image: image.image.clone(),
            alt_text: image.alt_text.clone(),
            is_primary: image.is_primary,
            created_at: image.created_at,
        };
        state.images.push(created.clone());
        Ok(created)
    }

    fn set_primary_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        if !state
            .images
            .iter()
            .any(|i| i.id == image_id && i.product_id == product_id)
        {
            return Ok(0);
        }
        for image in state
            .images
            .iter_mut()
            .filter(|i| i.product_id == product_id)
        {
            image.is_primary = image.id == image_id;
        }
        Ok(1)
    }
}

impl CartReader for TestRepository {
    fn get_cart_by_user(&self, user_id: UserId) -> RepositoryResult<Option<Cart>> {
        let state = self.state.lock().unwrap();
        Ok(state.carts.iter().find(|c| c.user_id == user_id).cloned())
    }

    fn list_cart_lines(&self, cart_id: CartId) -> RepositoryResult<Vec<CartLine>> {
        let state = self.state.lock().unwrap();
        let mut lines: Vec<CartLine> = state
            .items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .filter_map(|item| {
                state
                    .products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|product| CartLine {
                        item: item.clone(),
                        product: product.clone(),
                    })
            })
            .collect();
        lines.sort_by(|a, b| b.item.added_at.cmp(&a.item.added_at));
        Ok(lines)
    }

    fn get_cart_item(
        &self,
        item_id: CartItemId,
        cart_id: CartId,
    ) -> RepositoryResult<Option<CartItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .find(|i| i.id == item_id && i.cart_id == cart_id)
            .cloned())
    }
}

impl CartWriter for TestRepository {
    fn get_or_create_cart(&self, user_id: UserId) -> RepositoryResult<Cart> {
        let mut state = self.state.lock().unwrap();
        if let Some(cart) = state.carts.iter().find(|c| c.user_id == user_id) {
            return Ok(cart.clone());
        }
        let id = state.next_id();
        let cart = Cart {
            id: CartId::new(id)?,
            user_id,
            created_at: epoch(),
            updated_at: epoch(),
        };
        state.carts.push(cart.clone());
        Ok(cart)
    }

    fn add_cart_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: CartQuantity,
    ) -> RepositoryResult<CartItemWrite> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .items
            .iter()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
            .map_or(0, |i| i.quantity.get());
        Self::write_quantity(
            &mut state,
            cart_id,
            product_id,
            existing.saturating_add(quantity.get()),
        )
    }

    fn update_cart_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> RepositoryResult<Option<CartItemWrite>> {
        let mut state = self.state.lock().unwrap();
        if !state
            .items
            .iter()
            .any(|i| i.cart_id == cart_id && i.product_id == product_id)
        {
            return Ok(None);
        }
        Self::write_quantity(&mut state, cart_id, product_id, quantity).map(Some)
    }

    fn remove_cart_item(&self, cart_id: CartId, product_id: ProductId) -> RepositoryResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.items.len();
        state
            .items
            .retain(|i| !(i.cart_id == cart_id && i.product_id == product_id));
        Ok(state.items.len() < before)
    }

    fn clear_cart(&self, cart_id: CartId) -> RepositoryResult<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.items.len();
        state.items.retain(|i| i.cart_id != cart_id);
        Ok(before - state.items.len())
    }
}

/// Category fixture with a slug derived from its name.
pub fn sample_category(id: i32, name: &str) -> Category {
    Category {
        id: CategoryId::new(id).unwrap(),
        name: name.try_into().unwrap(),
        slug: crate::domain::types::Slug::from_name(name).unwrap(),
        description: String::new(),
        image: None,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// Active product fixture; `id` doubles as its creation timestamp so newer
/// ids sort first.
pub fn sample_product(
    id: i32,
    category_id: i32,
    name: &str,
    price: f64,
    discount: f64,
    stock: i32,
) -> Product {
    let created_at = DateTime::from_timestamp(i64::from(id), 0)
        .unwrap()
        .naive_utc();
    Product {
        id: ProductId::new(id).unwrap(),
        category_id: CategoryId::new(category_id).unwrap(),
        name: name.try_into().unwrap(),
        slug: crate::domain::types::Slug::from_name(name).unwrap(),
        description: format!("{name} description"),
        price: price.try_into().unwrap(),
        discount: discount.try_into().unwrap(),
        stock_quantity: stock.try_into().unwrap(),
        image: None,
        is_active: true,
        is_featured: false,
        created_at,
        updated_at: created_at,
    }
}
