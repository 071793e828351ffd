//! Populates the catalog with sample categories and products.
//!
//! Safe to run repeatedly: rows are looked up by slug and only missing ones
//! are inserted.

use std::error::Error;
use std::process;

use chrono::Utc;

use storefront::db::establish_connection_pool;
use storefront::domain::category::{Category, NewCategory};
use storefront::domain::product::NewProduct;
use storefront::domain::types::{
    CategoryName, DiscountPercent, ProductName, ProductPrice, Slug, StockQuantity,
};
use storefront::models::config::ServerConfig;
use storefront::repository::{
    CategoryReader, CategoryWriter, DieselRepository, ProductReader, ProductWriter,
};

struct SeedCategory {
    name: &'static str,
    description: &'static str,
}

struct SeedProduct {
    name: &'static str,
    category: &'static str,
    price: f64,
    discount: f64,
    stock: i32,
    description: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "T-Shirts",
        description: "Comfortable and stylish t-shirts for every occasion",
    },
    SeedCategory {
        name: "Jeans",
        description: "Classic and modern jeans in various fits and washes",
    },
    SeedCategory {
        name: "Dresses",
        description: "Elegant dresses for casual and formal occasions",
    },
    SeedCategory {
        name: "Shoes",
        description: "Footwear for every style and season",
    },
    SeedCategory {
        name: "Accessories",
        description: "Complete your look with our accessories",
    },
    SeedCategory {
        name: "Jackets",
        description: "Stay warm and stylish with our jacket collection",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Classic White T-Shirt",
        category: "T-Shirts",
        price: 19.99,
        discount: 10.0,
        stock: 50,
        description: "A timeless white t-shirt made from premium cotton. Perfect for layering or wearing on its own.",
    },
    SeedProduct {
        name: "Graphic Print T-Shirt",
        category: "T-Shirts",
        price: 24.99,
        discount: 0.0,
        stock: 30,
        description: "Express your style with this trendy graphic print t-shirt. Soft and comfortable fit.",
    },
    SeedProduct {
        name: "V-Neck T-Shirt",
        category: "T-Shirts",
        price: 22.99,
        discount: 15.0,
        stock: 25,
        description: "Elegant v-neck design in various colors. Great for both casual and semi-formal occasions.",
    },
    SeedProduct {
        name: "Classic Blue Jeans",
        category: "Jeans",
        price: 59.99,
        discount: 20.0,
        stock: 40,
        description: "Traditional blue jeans with a comfortable fit. Made from durable denim material.",
    },
    SeedProduct {
        name: "Skinny Fit Jeans",
        category: "Jeans",
        price: 69.99,
        discount: 0.0,
        stock: 35,
        description: "Modern skinny fit jeans that hug your curves. Available in multiple washes.",
    },
    SeedProduct {
        name: "High-Waisted Jeans",
        category: "Jeans",
        price: 64.99,
        discount: 12.0,
        stock: 28,
        description: "Flattering high-waisted design with a vintage-inspired look. Comfortable and stylish.",
    },
    SeedProduct {
        name: "Summer Floral Dress",
        category: "Dresses",
        price: 79.99,
        discount: 25.0,
        stock: 20,
        description: "Light and airy floral dress perfect for summer days. Flowing silhouette with beautiful patterns.",
    },
    SeedProduct {
        name: "Little Black Dress",
        category: "Dresses",
        price: 89.99,
        discount: 0.0,
        stock: 15,
        description: "The essential little black dress. Versatile and elegant for any occasion.",
    },
    SeedProduct {
        name: "Maxi Evening Dress",
        category: "Dresses",
        price: 129.99,
        discount: 30.0,
        stock: 12,
        description: "Stunning maxi dress for special occasions. Elegant design with attention to detail.",
    },
    SeedProduct {
        name: "Classic Sneakers",
        category: "Shoes",
        price: 89.99,
        discount: 15.0,
        stock: 45,
        description: "Comfortable and stylish sneakers for everyday wear. Available in multiple colors.",
    },
    SeedProduct {
        name: "Leather Boots",
        category: "Shoes",
        price: 149.99,
        discount: 0.0,
        stock: 25,
        description: "Premium leather boots with excellent craftsmanship. Perfect for fall and winter.",
    },
    SeedProduct {
        name: "High Heels",
        category: "Shoes",
        price: 99.99,
        discount: 20.0,
        stock: 30,
        description: "Elegant high heels for formal occasions. Comfortable design with stylish appeal.",
    },
    SeedProduct {
        name: "Leather Handbag",
        category: "Accessories",
        price: 79.99,
        discount: 10.0,
        stock: 20,
        description: "Premium leather handbag with multiple compartments. Perfect for daily use.",
    },
    SeedProduct {
        name: "Silk Scarf",
        category: "Accessories",
        price: 39.99,
        discount: 0.0,
        stock: 35,
        description: "Luxurious silk scarf with beautiful patterns. Adds elegance to any outfit.",
    },
    SeedProduct {
        name: "Statement Necklace",
        category: "Accessories",
        price: 49.99,
        discount: 18.0,
        stock: 25,
        description: "Bold statement necklace to complete your look. Eye-catching design with quality materials.",
    },
    SeedProduct {
        name: "Denim Jacket",
        category: "Jackets",
        price: 69.99,
        discount: 22.0,
        stock: 30,
        description: "Classic denim jacket with a modern fit. Versatile piece for layering.",
    },
    SeedProduct {
        name: "Leather Jacket",
        category: "Jackets",
        price: 199.99,
        discount: 0.0,
        stock: 15,
        description: "Premium leather jacket with edgy style. A timeless piece for your wardrobe.",
    },
    SeedProduct {
        name: "Blazer",
        category: "Jackets",
        price: 119.99,
        discount: 25.0,
        stock: 18,
        description: "Professional blazer perfect for work or formal events. Tailored fit with quality fabric.",
    },
];

fn seed_categories(repo: &DieselRepository) -> Result<Vec<Category>, Box<dyn Error>> {
    let now = Utc::now().naive_utc();
    let mut categories = Vec::with_capacity(CATEGORIES.len());

    for seed in CATEGORIES {
        let slug = Slug::from_name(seed.name)?;
        let category = match repo.get_category_by_slug(slug.as_str())? {
            Some(existing) => existing,
            None => {
                let created = repo.create_category(&NewCategory {
                    name: CategoryName::new(seed.name)?,
                    slug,
                    description: seed.description.to_string(),
                    image: None,
                    created_at: now,
                    updated_at: now,
                })?;
                log::info!("Created category: {}", created.name);
                created
            }
        };
        categories.push(category);
    }

    Ok(categories)
}

fn seed_products(repo: &DieselRepository, categories: &[Category]) -> Result<(), Box<dyn Error>> {
    let now = Utc::now().naive_utc();

    for (index, seed) in PRODUCTS.iter().enumerate() {
        let slug = Slug::from_name(seed.name)?;
        if repo.get_product_by_slug(slug.as_str())?.is_some() {
            continue;
        }
        let category = categories
            .iter()
            .find(|c| c.name.as_str() == seed.category)
            .ok_or_else(|| format!("unknown category {}", seed.category))?;

        let created = repo.create_product(&NewProduct {
            category_id: category.id,
            name: ProductName::new(seed.name)?,
            slug,
            description: seed.description.to_string(),
            price: ProductPrice::new(seed.price)?,
            discount: DiscountPercent::new(seed.discount)?,
            stock_quantity: StockQuantity::new(seed.stock)?,
            image: None,
            is_active: true,
            is_featured: index % 4 == 0,
            created_at: now,
            updated_at: now,
        })?;
        log::info!("Created product: {}", created.name);
    }

    Ok(())
}

fn run(config: &ServerConfig) -> Result<(), Box<dyn Error>> {
    let pool = establish_connection_pool(&config.database_url)?;
    let repo = DieselRepository::new(pool);

    let categories = seed_categories(&repo)?;
    seed_products(&repo, &categories)?;
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        log::error!("Failed to seed the catalog: {e}");
        process::exit(1);
    }
    log::info!("Successfully populated database with sample data");
}
