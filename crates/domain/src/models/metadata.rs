//! Product metadata DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_http_url;

/// Request to fetch metadata for a product page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct FetchMetadataRequest {
    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
}

/// Metadata scraped from a product page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ProductMetadata {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_metadata_request_validation() {
        let valid = FetchMetadataRequest {
            url: "https://shop.example.com/product/1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_scheme = FetchMetadataRequest {
            url: "file:///etc/passwd".to_string(),
        };
        assert!(bad_scheme.validate().is_err());
    }
}
