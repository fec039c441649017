//! Wishlist repository for database operations.
//!
//! Auto-named wishlist creation is an optimistic-insert loop: compute
//! the next candidate name, try the insert, and on a unique violation
//! increment the suffix and retry. Two concurrent requests computing
//! the same candidate both succeed, on different names. User-supplied
//! names get exactly one attempt; their collision is the caller's
//! conflict to report.

use domain::models::wishlist::next_candidate_name;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{WishlistEntity, WishlistWithOwnerEntity};
use crate::metrics::QueryTimer;
use crate::repositories::is_unique_violation;

/// Bound on auto-naming insert attempts.
pub const AUTO_NAME_MAX_ATTEMPTS: u32 = 5;

/// Errors from wishlist creation.
#[derive(Debug, Error)]
pub enum WishlistCreateError {
    /// A user-chosen name already exists for this owner in this group.
    #[error("A wishlist with this name already exists")]
    DuplicateName,

    /// Auto-naming lost the race on every attempt.
    #[error("Could not find a free wishlist name after {0} attempts")]
    AutoNameExhausted(u32),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for wishlist-related database operations.
#[derive(Clone)]
pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    /// Creates a new WishlistRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        group_id: Uuid,
        owner_id: Uuid,
        name: &str,
        is_default: bool,
    ) -> Result<WishlistEntity, sqlx::Error> {
        sqlx::query_as::<_, WishlistEntity>(
            r#"
            INSERT INTO wishlists (group_id, owner_id, name, is_default)
            VALUES ($1, $2, $3, $4)
            RETURNING id, group_id, owner_id, name, is_default, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(owner_id)
        .bind(name)
        .bind(is_default)
        .fetch_one(&self.pool)
        .await
    }

    /// Create a wishlist with a user-chosen name.
    ///
    /// A duplicate fails immediately; it is never silently renamed.
    pub async fn create_named(
        &self,
        group_id: Uuid,
        owner_id: Uuid,
        name: &str,
    ) -> Result<WishlistEntity, WishlistCreateError> {
        let timer = QueryTimer::new("create_wishlist_named");
        let result = self.insert(group_id, owner_id, name, false).await;
        timer.record();
        result.map_err(|e| {
            if is_unique_violation(&e) {
                WishlistCreateError::DuplicateName
            } else {
                WishlistCreateError::Database(e)
            }
        })
    }

    /// Create a wishlist with an auto-generated name.
    ///
    /// Retries with an incremented numeric suffix on unique violations,
    /// up to [`AUTO_NAME_MAX_ATTEMPTS`].
    pub async fn create_auto_named(
        &self,
        group_id: Uuid,
        owner_id: Uuid,
        base_name: &str,
        is_default: bool,
    ) -> Result<WishlistEntity, WishlistCreateError> {
        let timer = QueryTimer::new("create_wishlist_auto_named");
        for attempt in 0..AUTO_NAME_MAX_ATTEMPTS {
            let candidate = next_candidate_name(base_name, attempt);
            match self.insert(group_id, owner_id, &candidate, is_default).await {
                Ok(entity) => {
                    timer.record();
                    return Ok(entity);
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::debug!(
                        group_id = %group_id,
                        owner_id = %owner_id,
                        candidate = %candidate,
                        attempt = attempt,
                        "Wishlist name taken, retrying with next suffix"
                    );
                    continue;
                }
                Err(e) => {
                    timer.record();
                    return Err(WishlistCreateError::Database(e));
                }
            }
        }
        timer.record();
        Err(WishlistCreateError::AutoNameExhausted(
            AUTO_NAME_MAX_ATTEMPTS,
        ))
    }

    /// Check whether the owner already has a wishlist in the group.
    pub async fn owner_has_wishlist(
        &self,
        group_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("owner_has_wishlist");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM wishlists
                WHERE group_id = $1 AND owner_id = $2
            )
            "#,
        )
        .bind(group_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a wishlist by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WishlistEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_wishlist_by_id");
        let result = sqlx::query_as::<_, WishlistEntity>(
            r#"
            SELECT id, group_id, owner_id, name, is_default, created_at, updated_at
            FROM wishlists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the wishlists of a group with owner display names.
    pub async fn list_by_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<WishlistWithOwnerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_wishlists_by_group");
        let result = sqlx::query_as::<_, WishlistWithOwnerEntity>(
            r#"
            SELECT
                w.id, w.group_id, w.owner_id, w.name, w.is_default,
                w.created_at, w.updated_at,
                p.display_name as owner_name
            FROM wishlists w
            JOIN profiles p ON w.owner_id = p.id
            WHERE w.group_id = $1
            ORDER BY w.created_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a wishlist. Items and their claims cascade.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_wishlist");
        let result = sqlx::query(
            r#"
            DELETE FROM wishlists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: the retry loop is exercised against a real database in the
    // integration tests; the candidate-name sequence itself is covered
    // by unit tests in the domain crate.
}
