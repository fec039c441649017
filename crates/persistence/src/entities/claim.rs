//! Claim entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the claims table.
#[derive(Debug, Clone, FromRow)]
pub struct ClaimEntity {
    pub id: Uuid,
    pub item_id: Uuid,
    pub group_id: Uuid,
    pub claimer_id: Uuid,
    pub reveal_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ClaimEntity> for domain::models::Claim {
    fn from(entity: ClaimEntity) -> Self {
        Self {
            id: entity.id,
            item_id: entity.item_id,
            group_id: entity.group_id,
            claimer_id: entity.claimer_id,
            reveal_at: entity.reveal_at,
            note: entity.note,
            created_at: entity.created_at,
        }
    }
}

/// Claim entity with the claimer's display name, for claim views.
#[derive(Debug, Clone, FromRow)]
pub struct ClaimWithClaimerEntity {
    pub id: Uuid,
    pub item_id: Uuid,
    pub group_id: Uuid,
    pub claimer_id: Uuid,
    pub reveal_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub claimer_name: Option<String>,
}

impl From<ClaimWithClaimerEntity> for domain::models::Claim {
    fn from(entity: ClaimWithClaimerEntity) -> Self {
        Self {
            id: entity.id,
            item_id: entity.item_id,
            group_id: entity.group_id,
            claimer_id: entity.claimer_id,
            reveal_at: entity.reveal_at,
            note: entity.note,
            created_at: entity.created_at,
        }
    }
}
