//! Wishlist entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the wishlists table.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WishlistEntity> for domain::models::Wishlist {
    fn from(entity: WishlistEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            owner_id: entity.owner_id,
            name: entity.name,
            is_default: entity.is_default,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Wishlist entity with its owner's display name, for group listings.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistWithOwnerEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: Option<String>,
}
