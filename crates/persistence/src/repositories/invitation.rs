//! Invitation repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InvitationEntity, InvitationWithGroupEntity};
use crate::metrics::QueryTimer;

/// Repository for invitation-related database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new invitation.
    pub async fn create(
        &self,
        group_id: Uuid,
        email: &str,
        token: Uuid,
        invited_by: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (group_id, email, token, invited_by, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, group_id, email, token, invited_by, expires_at,
                      accepted_at, accepted_by, created_at
            "#,
        )
        .bind(group_id)
        .bind(email)
        .bind(token)
        .bind(invited_by)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an invitation by its token, with the group name.
    ///
    /// The invitee has no session when validating, so this lookup runs
    /// with full repository privileges rather than any viewer scoping.
    pub async fn find_by_token(
        &self,
        token: Uuid,
    ) -> Result<Option<InvitationWithGroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_token");
        let result = sqlx::query_as::<_, InvitationWithGroupEntity>(
            r#"
            SELECT
                i.id, i.group_id, i.email, i.token, i.invited_by, i.expires_at,
                i.accepted_at, i.accepted_by, i.created_at,
                g.name as group_name
            FROM invitations i
            JOIN groups g ON i.group_id = g.id
            WHERE i.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an invitation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_id");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, group_id, email, token, invited_by, expires_at,
                   accepted_at, accepted_by, created_at
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a live pending invitation exists for this email in
    /// the group.
    pub async fn has_pending_for_email(
        &self,
        group_id: Uuid,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("has_pending_invitation");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM invitations
                WHERE group_id = $1
                  AND LOWER(email) = LOWER($2)
                  AND accepted_at IS NULL
                  AND expires_at > NOW()
            )
            "#,
        )
        .bind(group_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Accept an invitation: stamp acceptance and create the membership
    /// in one transaction.
    ///
    /// Returns `true` if this call performed the acceptance, `false`
    /// if the invitation was already accepted (the membership insert is
    /// `ON CONFLICT DO NOTHING`, so a replayed accept stays a no-op).
    pub async fn accept(&self, invitation_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("accept_invitation");

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE invitations
            SET accepted_at = NOW(), accepted_by = $2
            WHERE id = $1 AND accepted_at IS NULL
            "#,
        )
        .bind(invitation_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated > 0 {
            sqlx::query(
                r#"
                INSERT INTO group_memberships (group_id, user_id, role)
                SELECT group_id, $2, 'member'
                FROM invitations
                WHERE id = $1
                ON CONFLICT (group_id, user_id) DO NOTHING
                "#,
            )
            .bind(invitation_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(updated > 0)
    }

    /// Delete expired, never-accepted invitations.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_invitations");
        let result = sqlx::query(
            r#"
            DELETE FROM invitations
            WHERE expires_at < NOW() AND accepted_at IS NULL
            "#,
        )
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: InvitationRepository tests require a database connection and
    // are covered by integration tests.
}
