//! Product metadata routes.

use axum::{extract::State, Json};
use domain::models::metadata::{FetchMetadataRequest, ProductMetadata};
use tracing::debug;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;
use crate::services::product_metadata::MetadataError;

/// Fetch metadata for a product page.
///
/// POST /api/v1/metadata/fetch
///
/// Fetches the URL with a bounded timeout and an SSRF guard, then
/// extracts Open Graph title/price/image for item pre-fill.
pub async fn fetch_metadata(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(request): Json<FetchMetadataRequest>,
) -> Result<Json<ProductMetadata>, ApiError> {
    request.validate()?;

    debug!(user_id = %ctx.user_id, url = %request.url, "Fetching product metadata");

    let metadata = state.metadata.fetch(&request.url).await.map_err(|e| match e {
        MetadataError::InvalidScheme | MetadataError::BlockedHost => {
            ApiError::Validation(e.to_string())
        }
        MetadataError::NotHtml => ApiError::Validation(e.to_string()),
        MetadataError::Timeout => {
            ApiError::ServiceUnavailable("Product page did not respond in time".to_string())
        }
        MetadataError::FetchFailed(_) => {
            ApiError::ServiceUnavailable("Could not fetch the product page".to_string())
        }
    })?;

    Ok(Json(metadata))
}
