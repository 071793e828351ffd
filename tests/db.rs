use diesel::prelude::*;
use storefront::schema::{cart_items, carts, categories, product_images, products};

mod common;

#[test]
fn migrations_create_storefront_tables() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("pooled connection");

    assert_eq!(categories::table.count().get_result::<i64>(&mut conn), Ok(0));
    assert_eq!(products::table.count().get_result::<i64>(&mut conn), Ok(0));
    assert_eq!(product_images::table.count().get_result::<i64>(&mut conn), Ok(0));
    assert_eq!(carts::table.count().get_result::<i64>(&mut conn), Ok(0));
    assert_eq!(cart_items::table.count().get_result::<i64>(&mut conn), Ok(0));
}
