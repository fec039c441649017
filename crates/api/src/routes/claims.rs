//! Claim routes: claim and unclaim items.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::claim::{CreateClaimRequest, CreateClaimResponse, UnclaimResponse};
use domain::services::visibility::authorize_unclaim;
use persistence::repositories::{ClaimRepository, GroupRepository, ItemRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Claim an item.
///
/// POST /api/v1/items/:item_id/claims
///
/// Any group member except the wishlist owner may claim. The reveal
/// date must be in the future. Single-claim items reject a second
/// claimer with a conflict.
pub async fn claim_item(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(item_id): Path<Uuid>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<CreateClaimResponse>), ApiError> {
    request.validate()?;
    shared::validation::validate_future_date(request.reveal_at)
        .map_err(|e| ApiError::Validation(e.message.map(|m| m.to_string()).unwrap_or_default()))?;

    let item_repo = ItemRepository::new(state.pool.clone());
    let item = item_repo
        .find_with_owner(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    // Claiming is group-scoped: the claimer must share the item's group.
    let group_repo = GroupRepository::new(state.pool.clone());
    if group_repo
        .get_membership(item.group_id, ctx.user_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(
            "Item not found or you are not a member of its group".to_string(),
        ));
    }

    let claim_repo = ClaimRepository::new(state.pool.clone());
    let claim = claim_repo
        .create_claim(item_id, ctx.user_id, request.reveal_at, request.note.as_deref())
        .await?;

    info!(
        claim_id = %claim.id,
        item_id = %item_id,
        claimer_id = %ctx.user_id,
        reveal_at = %claim.reveal_at,
        "Item claimed"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateClaimResponse {
            id: claim.id,
            item_id: claim.item_id,
            claimer_id: claim.claimer_id,
            reveal_at: claim.reveal_at,
            created_at: claim.created_at,
        }),
    ))
}

/// Unclaim an item.
///
/// DELETE /api/v1/items/:item_id/claims
///
/// Removes the caller's own claim. Nobody, the wishlist owner
/// included, can remove another user's claim.
pub async fn unclaim_item(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(item_id): Path<Uuid>,
) -> Result<Json<UnclaimResponse>, ApiError> {
    let claim_repo = ClaimRepository::new(state.pool.clone());

    let claim = claim_repo
        .find_by_item_and_claimer(item_id, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("You have no claim on this item".to_string()))?;

    let domain_claim: domain::models::Claim = claim.clone().into();
    authorize_unclaim(&domain_claim, ctx.user_id)?;

    claim_repo.delete(claim.id).await?;

    info!(
        claim_id = %claim.id,
        item_id = %item_id,
        claimer_id = %ctx.user_id,
        "Claim removed"
    );

    Ok(Json(UnclaimResponse {
        removed: true,
        item_id,
    }))
}
