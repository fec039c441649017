//! Item routes: add, edit, delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::item::{CreateItemRequest, DeleteResponse, UpdateItemRequest};
use domain::models::Item;
use persistence::repositories::{ItemRepository, WishlistRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Add an item to a wishlist.
///
/// POST /api/v1/wishlists/:wishlist_id/items
///
/// Only the wishlist owner may add items.
pub async fn create_item(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(wishlist_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    request.validate()?;

    let wishlist_repo = WishlistRepository::new(state.pool.clone());
    let wishlist = wishlist_repo
        .find_by_id(wishlist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".to_string()))?;

    if wishlist.owner_id != ctx.user_id {
        return Err(ApiError::Forbidden(
            "Only the wishlist owner can add items".to_string(),
        ));
    }

    let repo = ItemRepository::new(state.pool.clone());
    let item = repo
        .create(
            wishlist_id,
            request.title.trim(),
            request.url.as_deref(),
            request.price,
            request.currency.as_deref(),
            request.image_url.as_deref(),
            request.note.as_deref(),
            request.quantity.unwrap_or(1),
            request.allow_multiple_claims.unwrap_or(false),
        )
        .await?;

    info!(
        item_id = %item.id,
        wishlist_id = %wishlist_id,
        owner_id = %ctx.user_id,
        "Item added"
    );

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Edit an item.
///
/// PUT /api/v1/items/:item_id
///
/// Only the wishlist owner may edit; absent fields are unchanged.
pub async fn update_item(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Item>, ApiError> {
    request.validate()?;

    let repo = ItemRepository::new(state.pool.clone());
    let item = repo
        .find_with_owner(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    if item.owner_id != ctx.user_id {
        return Err(ApiError::Forbidden(
            "Only the wishlist owner can edit items".to_string(),
        ));
    }

    let updated = repo
        .update(
            item_id,
            request.title.as_deref().map(str::trim),
            request.url.as_deref(),
            request.price,
            request.currency.as_deref(),
            request.image_url.as_deref(),
            request.note.as_deref(),
            request.quantity,
            request.allow_multiple_claims,
        )
        .await?;

    info!(
        item_id = %item_id,
        owner_id = %ctx.user_id,
        "Item updated"
    );

    Ok(Json(updated.into()))
}

/// Delete an item.
///
/// DELETE /api/v1/items/:item_id
///
/// Only the wishlist owner may delete; claims on the item cascade.
pub async fn delete_item(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(item_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());
    let item = repo
        .find_with_owner(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    if item.owner_id != ctx.user_id {
        return Err(ApiError::Forbidden(
            "Only the wishlist owner can delete items".to_string(),
        ));
    }

    repo.delete(item_id).await?;

    info!(
        item_id = %item_id,
        owner_id = %ctx.user_id,
        "Item deleted"
    );

    Ok(Json(DeleteResponse {
        deleted: true,
        id: item_id,
    }))
}
