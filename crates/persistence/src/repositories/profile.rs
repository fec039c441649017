//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, email, display_name, is_global_admin, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a profile by email (exact match, as stored).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_email");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, email, display_name, is_global_admin, created_at, updated_at
            FROM profiles
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or refresh the profile mirror for an auth-provider user.
    ///
    /// Sessions are issued upstream; the first request from a new user
    /// materializes their profile row here.
    pub async fn upsert(
        &self,
        id: Uuid,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (id, email, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                display_name = COALESCE(EXCLUDED.display_name, profiles.display_name),
                updated_at = NOW()
            RETURNING id, email, display_name, is_global_admin, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set or clear the global-admin capability.
    pub async fn set_global_admin(
        &self,
        user_id: Uuid,
        is_global_admin: bool,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_global_admin");
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET is_global_admin = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(is_global_admin)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete a user account. Cascades to memberships, wishlists,
    /// items, claims, and invitations they issued.
    pub async fn delete(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_profile");
        let result = sqlx::query(
            r#"
            DELETE FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check whether the viewer holds owner/admin in any group the
    /// subject belongs to. Feeds the email masking policy.
    pub async fn shares_group_as_admin(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("shares_group_as_admin");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM group_memberships viewer_m
                JOIN group_memberships subject_m
                  ON viewer_m.group_id = subject_m.group_id
                WHERE viewer_m.user_id = $1
                  AND subject_m.user_id = $2
                  AND viewer_m.role IN ('owner', 'admin')
            )
            "#,
        )
        .bind(viewer_id)
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether the viewer shares at least one group with the subject.
    pub async fn shares_group(
        &self,
        viewer_id: Uuid,
        subject_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("shares_group");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM group_memberships viewer_m
                JOIN group_memberships subject_m
                  ON viewer_m.group_id = subject_m.group_id
                WHERE viewer_m.user_id = $1
                  AND subject_m.user_id = $2
            )
            "#,
        )
        .bind(viewer_id)
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ProfileRepository tests require a database connection and are
    // covered by integration tests.
}
