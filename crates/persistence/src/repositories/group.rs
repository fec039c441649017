//! Group repository for database operations.

use domain::models::group::MemberRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    GroupEntity, GroupWithMembershipEntity, MemberRoleDb, MemberWithProfileEntity,
    MembershipEntity,
};
use crate::metrics::QueryTimer;

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group and add the creator as owner.
    pub async fn create_group(
        &self,
        name: &str,
        created_by: Uuid,
    ) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");

        // Group and owner membership must appear together.
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, created_by)
            VALUES ($1, $2)
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_memberships (group_id, user_id, role)
            VALUES ($1, $2, 'owner')
            "#,
        )
        .bind(group.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(group)
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, created_by, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find all groups a user belongs to.
    pub async fn find_user_groups(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<GroupWithMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_groups");
        let result = sqlx::query_as::<_, GroupWithMembershipEntity>(
            r#"
            SELECT
                g.id, g.name, g.created_by, g.created_at, g.updated_at,
                gm.id as membership_id, gm.role, gm.joined_at,
                (SELECT COUNT(*) FROM group_memberships WHERE group_id = g.id) as member_count
            FROM groups g
            JOIN group_memberships gm ON g.id = gm.group_id
            WHERE gm.user_id = $1
            ORDER BY gm.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a group with membership info for a specific user.
    pub async fn find_group_with_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupWithMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_with_membership");
        let result = sqlx::query_as::<_, GroupWithMembershipEntity>(
            r#"
            SELECT
                g.id, g.name, g.created_by, g.created_at, g.updated_at,
                gm.id as membership_id, gm.role, gm.joined_at,
                (SELECT COUNT(*) FROM group_memberships WHERE group_id = g.id) as member_count
            FROM groups g
            JOIN group_memberships gm ON g.id = gm.group_id
            WHERE g.id = $1 AND gm.user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a group. Memberships, wishlists, items, claims, and
    /// invitations go with it via cascade.
    pub async fn delete_group(&self, group_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query(
            r#"
            DELETE FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Get a user's membership for a group.
    pub async fn get_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_group_membership");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT id, group_id, user_id, role, joined_at
            FROM group_memberships
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a member to a group.
    pub async fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<MembershipEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_group_member");
        let role_db: MemberRoleDb = role.into();
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            INSERT INTO group_memberships (group_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role_db)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a member's role.
    pub async fn update_member_role(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        new_role: MemberRole,
    ) -> Result<MembershipEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_member_role");
        let role_db: MemberRoleDb = new_role.into();
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            UPDATE group_memberships
            SET role = $3
            WHERE group_id = $1 AND user_id = $2
            RETURNING id, group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role_db)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a member from a group.
    pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_group_member");
        let result = sqlx::query(
            r#"
            DELETE FROM group_memberships
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List members of a group with pagination, joined with profiles.
    pub async fn list_members(
        &self,
        group_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MemberWithProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_group_members");
        let result = sqlx::query_as::<_, MemberWithProfileEntity>(
            r#"
            SELECT
                gm.id, gm.group_id, gm.user_id, gm.role, gm.joined_at,
                p.display_name, p.email
            FROM group_memberships gm
            JOIN profiles p ON gm.user_id = p.id
            WHERE gm.group_id = $1
            ORDER BY gm.joined_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count total members in a group.
    pub async fn count_members(&self, group_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_group_members");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM group_memberships
            WHERE group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: GroupRepository tests require a database connection and are
    // covered by integration tests.
}
