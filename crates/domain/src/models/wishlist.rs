//! Wishlist domain models and auto-naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents a wishlist owned by one user within one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Wishlist {
    pub id: Uuid,
    pub group_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a wishlist.
///
/// When `name` is absent, the server derives one from the owner's
/// display name and resolves collisions by numeric suffix.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateWishlistRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: Option<String>,
}

/// Response after creating a wishlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateWishlistResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Wishlist summary for listing, with its items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WishlistSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub name: String,
    pub is_default: bool,
    pub items: Vec<super::item::ItemResponse>,
}

/// Response for listing the wishlists of a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListWishlistsResponse {
    pub data: Vec<WishlistSummary>,
}

/// Derive the default wishlist name for a user.
pub fn default_wishlist_name(display_name: Option<&str>) -> String {
    match display_name {
        Some(name) if !name.trim().is_empty() => format!("{}'s Wishlist", name.trim()),
        _ => "My Wishlist".to_string(),
    }
}

/// Compute the candidate name for an auto-naming attempt.
///
/// Attempt 0 yields the base name itself; attempt n yields
/// "{base} {n + 1}", so collisions resolve to "Base", "Base 2", "Base 3".
pub fn next_candidate_name(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{} {}", base, attempt + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wishlist_name() {
        assert_eq!(default_wishlist_name(Some("Alice")), "Alice's Wishlist");
        assert_eq!(default_wishlist_name(Some("  Bob  ")), "Bob's Wishlist");
        assert_eq!(default_wishlist_name(Some("")), "My Wishlist");
        assert_eq!(default_wishlist_name(Some("   ")), "My Wishlist");
        assert_eq!(default_wishlist_name(None), "My Wishlist");
    }

    #[test]
    fn test_next_candidate_name_sequence() {
        let base = "Alice's Wishlist";
        assert_eq!(next_candidate_name(base, 0), "Alice's Wishlist");
        assert_eq!(next_candidate_name(base, 1), "Alice's Wishlist 2");
        assert_eq!(next_candidate_name(base, 2), "Alice's Wishlist 3");
        assert_eq!(next_candidate_name(base, 4), "Alice's Wishlist 5");
    }

    #[test]
    fn test_create_wishlist_request_validation() {
        let unnamed = CreateWishlistRequest { name: None };
        assert!(unnamed.validate().is_ok());

        let named = CreateWishlistRequest {
            name: Some("Birthday Ideas".to_string()),
        };
        assert!(named.validate().is_ok());

        let empty = CreateWishlistRequest {
            name: Some("".to_string()),
        };
        assert!(empty.validate().is_err());

        let oversized = CreateWishlistRequest {
            name: Some("x".repeat(201)),
        };
        assert!(oversized.validate().is_err());
    }
}
