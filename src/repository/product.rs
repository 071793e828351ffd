use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::product::{NewProduct, NewProductImage, Product, ProductImage, UpdateProduct};
use crate::domain::types::{ProductId, ProductImageId, ProductSort};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset};
use crate::models::product_image::{
    NewProductImage as DbNewProductImage, ProductImage as DbProductImage,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};
use crate::schema::{categories, products};

/// Wraps `search` for a `LIKE ... ESCAPE '\\'` match so `%` and `_` in user
/// input match literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Products matching every filter of `query`, unordered and unpaged.
fn filtered_products(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = products::table.into_boxed::<Sqlite>();

    if query.active_only {
        items = items.filter(products::is_active.eq(true));
    }

    if query.featured_only {
        items = items.filter(products::is_featured.eq(true));
    }

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    // SQLite LIKE is case-insensitive for ASCII.
    if let Some(pattern) = search {
        if query.search_category_names {
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(products::description.like(pattern.clone()).escape('\\'))
                    .or(products::category_id.eq_any(
                        categories::table
                            .filter(categories::name.like(pattern).escape('\\'))
                            .select(categories::id),
                    )),
            );
        } else {
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(products::description.like(pattern).escape('\\')),
            );
        }
    }

    if let Some(slug) = &query.category_slug {
        items = items.filter(
            products::category_id.eq_any(
                categories::table
                    .filter(categories::slug.eq(slug.clone()))
                    .select(categories::id),
            ),
        );
    }

    if let Some(category_id) = query.category_id {
        items = items.filter(products::category_id.eq(category_id.get()));
    }

    if let Some(min_price) = query.min_price {
        items = items.filter(products::price.ge(min_price.get()));
    }

    if let Some(max_price) = query.max_price {
        items = items.filter(products::price.le(max_price.get()));
    }

    if let Some(exclude) = query.exclude {
        items = items.filter(products::id.ne(exclude.get()));
    }

    items
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_products(&query);

        items = match query.sort {
            ProductSort::Newest => items.order((products::created_at.desc(), products::id.desc())),
            ProductSort::PriceLow => items.order((products::price.asc(), products::id.desc())),
            ProductSort::PriceHigh => items.order((products::price.desc(), products::id.desc())),
            ProductSort::Name => items.order((products::name.asc(), products::id.desc())),
            ProductSort::Discount => {
                items.order((products::discount.desc(), products::id.desc()))
            }
        };

        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let items = items
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>, _>>()?;

        Ok((total, items))
    }

    fn count_products(&self, query: &ProductListQuery) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered_products(query)
            .count()
            .get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::id.eq(id.get()))
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn get_product_by_slug(&self, slug: &str) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let product = products::table
            .filter(products::slug.eq(slug))
            .select(DbProduct::as_select())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(TryInto::try_into).transpose()?)
    }

    fn list_product_images(
        &self,
        product_ids: &[ProductId],
    ) -> RepositoryResult<Vec<ProductImage>> {
        use crate::schema::product_images;

        if product_ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let ids: Vec<i32> = product_ids.iter().map(|id| id.get()).collect();

        let images = product_images::table
            .filter(product_images::product_id.eq_any(ids))
            .order((
                product_images::is_primary.desc(),
                product_images::created_at.asc(),
                product_images::id.asc(),
            ))
            .select(DbProductImage::as_select())
            .load::<DbProductImage>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<ProductImage>, _>>()?;

        Ok(images)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(products::table)
            .values(DbNewProduct::from(product))
            .returning(DbProduct::as_returning())
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, product: &UpdateProduct) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::update(products::table.filter(products::id.eq(id.get())))
            .set(ProductChangeset::new(product, Utc::now().naive_utc()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(products::table.filter(products::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn add_product_image(&self, image: &NewProductImage) -> RepositoryResult<ProductImage> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        let created = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            if image.is_primary {
                diesel::update(
                    product_images::table
                        .filter(product_images::product_id.eq(image.product_id.get()))
                        .filter(product_images::is_primary.eq(true)),
                )
                .set(product_images::is_primary.eq(false))
                .execute(conn)?;
            }

            let created = diesel::insert_into(product_images::table)
                .values(DbNewProductImage::from(image))
                .returning(DbProductImage::as_returning())
                .get_result::<DbProductImage>(conn)?;
            Ok(created)
        })?;

        Ok(created.try_into()?)
    }

    fn set_primary_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> RepositoryResult<usize> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let belongs = product_images::table
                .filter(product_images::id.eq(image_id.get()))
                .filter(product_images::product_id.eq(product_id.get()))
                .count()
                .get_result::<i64>(conn)?;
            if belongs == 0 {
                return Ok(0);
            }

            diesel::update(
                product_images::table
                    .filter(product_images::product_id.eq(product_id.get()))
                    .filter(product_images::id.ne(image_id.get())),
            )
            .set(product_images::is_primary.eq(false))
            .execute(conn)?;

            let affected =
                diesel::update(product_images::table.filter(product_images::id.eq(image_id.get())))
                    .set(product_images::is_primary.eq(true))
                    .execute(conn)?;
            Ok(affected)
        })
    }
}
