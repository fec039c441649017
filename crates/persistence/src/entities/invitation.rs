//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub email: String,
    pub token: Uuid,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<InvitationEntity> for domain::models::Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            email: entity.email,
            token: entity.token,
            invited_by: entity.invited_by,
            expires_at: entity.expires_at,
            accepted_at: entity.accepted_at,
            accepted_by: entity.accepted_by,
            created_at: entity.created_at,
        }
    }
}

/// Invitation entity with its group's name, for the public validate
/// endpoint.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationWithGroupEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub email: String,
    pub token: Uuid,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub group_name: String,
}

impl From<InvitationWithGroupEntity> for domain::models::Invitation {
    fn from(entity: InvitationWithGroupEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            email: entity.email,
            token: entity.token,
            invited_by: entity.invited_by,
            expires_at: entity.expires_at,
            accepted_at: entity.accepted_at,
            accepted_by: entity.accepted_by,
            created_at: entity.created_at,
        }
    }
}
