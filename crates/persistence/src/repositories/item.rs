//! Item repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ItemEntity, ItemWithOwnerEntity};
use crate::metrics::QueryTimer;

/// Repository for item-related database operations.
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Creates a new ItemRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new item on a wishlist.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        wishlist_id: Uuid,
        title: &str,
        url: Option<&str>,
        price: Option<f64>,
        currency: Option<&str>,
        image_url: Option<&str>,
        note: Option<&str>,
        quantity: i32,
        allow_multiple_claims: bool,
    ) -> Result<ItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            INSERT INTO items (wishlist_id, title, url, price, currency, image_url, note, quantity, allow_multiple_claims)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, wishlist_id, title, url, price, currency, image_url, note,
                      quantity, allow_multiple_claims, created_at, updated_at
            "#,
        )
        .bind(wishlist_id)
        .bind(title)
        .bind(url)
        .bind(price)
        .bind(currency)
        .bind(image_url)
        .bind(note)
        .bind(quantity)
        .bind(allow_multiple_claims)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an item joined with its wishlist's owner and group.
    pub async fn find_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<ItemWithOwnerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_item_with_owner");
        let result = sqlx::query_as::<_, ItemWithOwnerEntity>(
            r#"
            SELECT
                i.id, i.wishlist_id, i.title, i.url, i.price, i.currency, i.image_url,
                i.note, i.quantity, i.allow_multiple_claims, i.created_at, i.updated_at,
                w.owner_id, w.group_id
            FROM items i
            JOIN wishlists w ON i.wishlist_id = w.id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an item. Absent fields keep their current values.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        url: Option<&str>,
        price: Option<f64>,
        currency: Option<&str>,
        image_url: Option<&str>,
        note: Option<&str>,
        quantity: Option<i32>,
        allow_multiple_claims: Option<bool>,
    ) -> Result<ItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_item");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            UPDATE items
            SET
                title = COALESCE($2, title),
                url = COALESCE($3, url),
                price = COALESCE($4, price),
                currency = COALESCE($5, currency),
                image_url = COALESCE($6, image_url),
                note = COALESCE($7, note),
                quantity = COALESCE($8, quantity),
                allow_multiple_claims = COALESCE($9, allow_multiple_claims),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, wishlist_id, title, url, price, currency, image_url, note,
                      quantity, allow_multiple_claims, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(url)
        .bind(price)
        .bind(currency)
        .bind(image_url)
        .bind(note)
        .bind(quantity)
        .bind(allow_multiple_claims)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an item. Claims on it cascade.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_item");
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List the items of a set of wishlists, for group wishlist views.
    pub async fn list_by_wishlists(
        &self,
        wishlist_ids: &[Uuid],
    ) -> Result<Vec<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_items_by_wishlists");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT id, wishlist_id, title, url, price, currency, image_url, note,
                   quantity, allow_multiple_claims, created_at, updated_at
            FROM items
            WHERE wishlist_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(wishlist_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the items of a wishlist.
    pub async fn list_by_wishlist(
        &self,
        wishlist_id: Uuid,
    ) -> Result<Vec<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_items_by_wishlist");
        let result = sqlx::query_as::<_, ItemEntity>(
            r#"
            SELECT id, wishlist_id, title, url, price, currency, image_url, note,
                   quantity, allow_multiple_claims, created_at, updated_at
            FROM items
            WHERE wishlist_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(wishlist_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ItemRepository tests require a database connection and are
    // covered by integration tests.
}
