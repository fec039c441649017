//! Item domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_currency, validate_http_url};

/// Represents an item on a wishlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Item {
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

/// Request payload for adding an item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateItemRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Title must be between 1 and 500 characters"
    ))]
    pub title: String,

    #[validate(custom(function = "validate_http_url"))]
    pub url: Option<String>,

    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: Option<f64>,

    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,

    pub allow_multiple_claims: Option<bool>,
}

/// Request payload for editing an item. Absent fields are unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateItemRequest {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Title must be between 1 and 500 characters"
    ))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub url: Option<String>,

    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: Option<f64>,

    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,

    pub allow_multiple_claims: Option<bool>,
}

/// Item response with the claims the viewer is allowed to see.
///
/// `claimed` reflects only the visible claims: an owner looking at an
/// item whose claims all have future reveal dates sees it unclaimed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ItemResponse {
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
    pub claimed: bool,
    pub claims: Vec<super::claim::ClaimView>,
    pub created_at: DateTime<Utc>,
}

/// Response when deleting an item or a wishlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeleteResponse {
    pub deleted: bool,
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateItemRequest {
        CreateItemRequest {
            title: "Mechanical Keyboard".to_string(),
            url: Some("https://shop.example.com/kb".to_string()),
            price: Some(129.99),
            currency: Some("EUR".to_string()),
            image_url: Some("https://shop.example.com/kb.jpg".to_string()),
            note: Some("Prefer the brown switches".to_string()),
            quantity: Some(1),
            allow_multiple_claims: Some(false),
        }
    }

    #[test]
    fn test_create_item_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_item_title_limits() {
        let mut request = valid_request();
        request.title = "".to_string();
        assert!(request.validate().is_err());

        request.title = "x".repeat(501);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_item_rejects_negative_price() {
        let mut request = valid_request();
        request.price = Some(-5.0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_item_rejects_bad_url() {
        let mut request = valid_request();
        request.url = Some("ftp://example.com".to_string());
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.url = Some(format!("https://e.com/{}", "a".repeat(2048)));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_item_rejects_long_note() {
        let mut request = valid_request();
        request.note = Some("n".repeat(1001));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_item_rejects_zero_quantity() {
        let mut request = valid_request();
        request.quantity = Some(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_item_request_all_absent_is_valid() {
        let request = UpdateItemRequest {
            title: None,
            url: None,
            price: None,
            currency: None,
            image_url: None,
            note: None,
            quantity: None,
            allow_multiple_claims: None,
        };
        assert!(request.validate().is_ok());
    }
}
