//! Claim domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A member's commitment to gift an item, hidden from the wishlist
/// owner until the reveal date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Claim {
    pub id: Uuid,
    pub item_id: Uuid,
    pub group_id: Uuid,
    pub claimer_id: Uuid,
    pub reveal_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for claiming an item.
///
/// The reveal date must be in the future; the handler checks it
/// against the clock after structural validation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateClaimRequest {
    pub reveal_at: DateTime<Utc>,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Response after claiming an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateClaimResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub claimer_id: Uuid,
    pub reveal_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Response after unclaiming an item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UnclaimResponse {
    pub removed: bool,
    pub item_id: Uuid,
}

/// Claim as exposed to a viewer that passed the visibility engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaimView {
    pub id: Uuid,
    pub item_id: Uuid,
    pub claimer_id: Uuid,
    pub claimer_name: Option<String>,
    pub reveal_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_claim_request_valid() {
        let valid = CreateClaimRequest {
            reveal_at: Utc::now() + Duration::days(14),
            note: Some("wrapping at my place".to_string()),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_create_claim_request_long_note_rejected() {
        let invalid = CreateClaimRequest {
            reveal_at: Utc::now() + Duration::days(1),
            note: Some("n".repeat(501)),
        };
        assert!(invalid.validate().is_err());
    }
}
