//! Helpers for integration tests.

use chrono::{DateTime, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use storefront::db::{DbPool, establish_connection_pool};
use storefront::domain::category::{Category, NewCategory};
use storefront::domain::product::{NewProduct, Product};
use storefront::domain::types::{
    CategoryName, DiscountPercent, ProductName, ProductPrice, Slug, StockQuantity,
};
use storefront::repository::{CategoryWriter, DieselRepository, ProductWriter};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Timestamp `seconds` after the epoch, used to order fixtures deterministically.
pub fn at(seconds: i64) -> NaiveDateTime {
    DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
}

pub fn create_category(repo: &DieselRepository, name: &str) -> Category {
    repo.create_category(&NewCategory {
        name: CategoryName::new(name).unwrap(),
        slug: Slug::from_name(name).unwrap(),
        description: format!("{name} collection"),
        image: None,
        created_at: at(0),
        updated_at: at(0),
    })
    .expect("should create category")
}

pub fn new_product(
    category: &Category,
    name: &str,
    price: f64,
    discount: f64,
    stock: i32,
) -> NewProduct {
    NewProduct {
        category_id: category.id,
        name: ProductName::new(name).unwrap(),
        slug: Slug::from_name(name).unwrap(),
        description: format!("{name} description"),
        price: ProductPrice::new(price).unwrap(),
        discount: DiscountPercent::new(discount).unwrap(),
        stock_quantity: StockQuantity::new(stock).unwrap(),
        image: None,
        is_active: true,
        is_featured: false,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub fn create_product(
    repo: &DieselRepository,
    category: &Category,
    name: &str,
    price: f64,
    discount: f64,
    stock: i32,
) -> Product {
    repo.create_product(&new_product(category, name, price, discount, stock))
        .expect("should create product")
}
