use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::cart::{Cart, CartItem, CartItemWrite, CartLine, clamp_to_stock};
use crate::domain::types::{CartId, CartItemId, CartQuantity, ProductId, StockQuantity, UserId};
use crate::models::cart::{
    Cart as DbCart, CartItem as DbCartItem, NewCart as DbNewCart, NewCartItem as DbNewCartItem,
};
use crate::models::product::Product as DbProduct;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CartReader, CartWriter, DieselRepository};

impl CartReader for DieselRepository {
    fn get_cart_by_user(&self, user_id: UserId) -> RepositoryResult<Option<Cart>> {
        use crate::schema::carts;

        let mut conn = self.conn()?;

        let cart = carts::table
            .filter(carts::user_id.eq(user_id.get()))
            .select(DbCart::as_select())
            .first::<DbCart>(&mut conn)
            .optional()?;

        Ok(cart.map(TryInto::try_into).transpose()?)
    }

    fn list_cart_lines(&self, cart_id: CartId) -> RepositoryResult<Vec<CartLine>> {
        use crate::schema::{cart_items, products};

        let mut conn = self.conn()?;

        let rows = cart_items::table
            .inner_join(products::table)
            .filter(cart_items::cart_id.eq(cart_id.get()))
            .order((cart_items::added_at.desc(), cart_items::id.desc()))
            .select((DbCartItem::as_select(), DbProduct::as_select()))
            .load::<(DbCartItem, DbProduct)>(&mut conn)?;

        rows.into_iter()
            .map(|(item, product)| -> RepositoryResult<CartLine> {
                Ok(CartLine {
                    item: item.try_into()?,
                    product: product.try_into()?,
                })
            })
            .collect()
    }

    fn get_cart_item(
        &self,
        item_id: CartItemId,
        cart_id: CartId,
    ) -> RepositoryResult<Option<CartItem>> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let item = cart_items::table
            .filter(cart_items::id.eq(item_id.get()))
            .filter(cart_items::cart_id.eq(cart_id.get()))
            .select(DbCartItem::as_select())
            .first::<DbCartItem>(&mut conn)
            .optional()?;

        Ok(item.map(TryInto::try_into).transpose()?)
    }
}

/// Reads the rows a cart write depends on. Must run inside the write transaction.
fn load_item_and_stock(
    conn: &mut SqliteConnection,
    cart_id: CartId,
    product_id: ProductId,
) -> RepositoryResult<(Option<DbCartItem>, Option<StockQuantity>)> {
    use crate::schema::{cart_items, products};

    let existing = cart_items::table
        .filter(cart_items::cart_id.eq(cart_id.get()))
        .filter(cart_items::product_id.eq(product_id.get()))
        .select(DbCartItem::as_select())
        .first::<DbCartItem>(conn)
        .optional()?;

    let stock = products::table
        .filter(products::id.eq(product_id.get()))
        .select(products::stock_quantity)
        .first::<i32>(conn)
        .optional()?
        .map(StockQuantity::new)
        .transpose()?;

    Ok((existing, stock))
}

/// Write the clamped quantity for `(cart_id, product_id)`, deleting the row
/// when nothing may be stored.
fn persist_quantity(
    conn: &mut SqliteConnection,
    cart_id: CartId,
    product_id: ProductId,
    existing: Option<DbCartItem>,
    requested: i32,
    stock: StockQuantity,
) -> RepositoryResult<CartItemWrite> {
    use crate::schema::{cart_items, carts};

    let now = Utc::now().naive_utc();

    let stored = match (clamp_to_stock(requested, stock), existing) {
        (None, Some(item)) => {
            diesel::delete(cart_items::table.filter(cart_items::id.eq(item.id))).execute(conn)?;
            None
        }
        (None, None) => None,
        (Some(quantity), Some(item)) => Some(
            diesel::update(cart_items::table.filter(cart_items::id.eq(item.id)))
                .set((
                    cart_items::quantity.eq(quantity.get()),
                    cart_items::updated_at.eq(now),
                ))
                .returning(DbCartItem::as_returning())
                .get_result::<DbCartItem>(conn)?,
        ),
        (Some(quantity), None) => Some(
            diesel::insert_into(cart_items::table)
                .values(DbNewCartItem {
                    cart_id: cart_id.get(),
                    product_id: product_id.get(),
                    quantity: quantity.get(),
                    added_at: now,
                    updated_at: now,
                })
                .returning(DbCartItem::as_returning())
                .get_result::<DbCartItem>(conn)?,
        ),
    };

    diesel::update(carts::table.filter(carts::id.eq(cart_id.get())))
        .set(carts::updated_at.eq(now))
        .execute(conn)?;

    Ok(CartItemWrite {
        requested,
        stock,
        item: stored.map(TryInto::try_into).transpose()?,
    })
}

impl CartWriter for DieselRepository {
    fn get_or_create_cart(&self, user_id: UserId) -> RepositoryResult<Cart> {
        use crate::schema::carts;

        let mut conn = self.conn()?;

        let cart = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let existing = carts::table
                .filter(carts::user_id.eq(user_id.get()))
                .select(DbCart::as_select())
                .first::<DbCart>(conn)
                .optional()?;
            if let Some(cart) = existing {
                return Ok(cart);
            }

            let now = Utc::now().naive_utc();
            let created = diesel::insert_into(carts::table)
                .values(DbNewCart {
                    user_id: user_id.get(),
                    created_at: now,
                    updated_at: now,
                })
                .returning(DbCart::as_returning())
                .get_result::<DbCart>(conn)?;
            Ok(created)
        })?;

        Ok(cart.try_into()?)
    }

    fn add_cart_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: CartQuantity,
    ) -> RepositoryResult<CartItemWrite> {
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock before the read, so concurrent adds
        // for the same item serialize instead of losing an increment.
        conn.immediate_transaction(|conn| {
            let (existing, stock) = load_item_and_stock(conn, cart_id, product_id)?;
            let stock = stock.ok_or(RepositoryError::NotFound)?;
            let requested = existing
                .as_ref()
                .map_or(0, |item| item.quantity)
                .saturating_add(quantity.get());
            persist_quantity(conn, cart_id, product_id, existing, requested, stock)
        })
    }

    fn update_cart_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> RepositoryResult<Option<CartItemWrite>> {
        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let (existing, stock) = load_item_and_stock(conn, cart_id, product_id)?;
            let Some(existing) = existing else {
                return Ok(None);
            };
            let stock = stock.ok_or(RepositoryError::NotFound)?;
            persist_quantity(conn, cart_id, product_id, Some(existing), quantity, stock).map(Some)
        })
    }

    fn remove_cart_item(&self, cart_id: CartId, product_id: ProductId) -> RepositoryResult<bool> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            cart_items::table
                .filter(cart_items::cart_id.eq(cart_id.get()))
                .filter(cart_items::product_id.eq(product_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected > 0)
    }

    fn clear_cart(&self, cart_id: CartId) -> RepositoryResult<usize> {
        use crate::schema::cart_items;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart_id.get())))
                .execute(&mut conn)?;

        Ok(affected)
    }
}
