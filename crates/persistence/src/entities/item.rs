//! Item entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the items table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemEntity {
    pub id: Uuid,
    pub wishlist_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub note: Option<String>,
    pub quantity: i32,
    pub allow_multiple_claims: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemEntity> for domain::models::Item {
    fn from(entity: ItemEntity) -> Self {
        Self {
            id: entity.id,
            wishlist_id: entity.wishlist_id,
            title: entity.title,
            url: entity.url,
            price: entity.price,
            currency: entity.currency,
            image_url: entity.image_url,
            note: entity.note,
            quantity: entity.quantity,
            allow_multiple_claims: entity.allow_multiple_claims,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Item entity joined with its wishlist's owner and group, for
/// ownership checks on item mutations.
#[derive(Debug, Clone, FromRow)]
pub struct ItemWithOwnerEntity {
    pub id: Uuid,
    pub wishlist_id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub note: Option<String>,
    pub quantity: i32,
    pub allow_multiple_claims: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub group_id: Uuid,
}

/// Minimal item row locked during claim creation.
#[derive(Debug, Clone, FromRow)]
pub struct ItemClaimContextEntity {
    pub id: Uuid,
    pub allow_multiple_claims: bool,
    pub owner_id: Uuid,
    pub group_id: Uuid,
}
