//! Wishlist routes: creation (with auto-naming), listing, deletion.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::claim::ClaimView;
use domain::models::item::{DeleteResponse, ItemResponse};
use domain::models::wishlist::{
    default_wishlist_name, CreateWishlistRequest, CreateWishlistResponse, ListWishlistsResponse,
    WishlistSummary,
};
use domain::services::authorization::{authorize_group_action, resolve_role, GroupAction};
use domain::services::visibility::claim_visible;
use persistence::entities::{ClaimWithClaimerEntity, ItemEntity};
use persistence::repositories::{ClaimRepository, GroupRepository, ItemRepository, WishlistRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Create a wishlist.
///
/// POST /api/v1/groups/:group_id/wishlists
///
/// With a user-chosen name, a duplicate fails with a conflict. Without
/// one, the server derives a name from the caller's display name and
/// resolves collisions with a bounded optimistic-insert retry.
pub async fn create_wishlist(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(group_id): Path<Uuid>,
    Json(request): Json<CreateWishlistRequest>,
) -> Result<(StatusCode, Json<CreateWishlistResponse>), ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let membership = group_repo
        .get_membership(group_id, ctx.user_id)
        .await?
        .map(domain::models::Membership::from);
    authorize_group_action(
        ctx.context(),
        resolve_role(membership.as_ref()),
        GroupAction::CreateWishlist,
    )?;

    let repo = WishlistRepository::new(state.pool.clone());

    let wishlist = match request.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => repo.create_named(group_id, ctx.user_id, name).await?,
        _ => {
            // The first list a member gets in a group is their default.
            let is_default = !repo.owner_has_wishlist(group_id, ctx.user_id).await?;
            let base = default_wishlist_name(ctx.display_name.as_deref());
            repo.create_auto_named(group_id, ctx.user_id, &base, is_default)
                .await?
        }
    };

    info!(
        wishlist_id = %wishlist.id,
        group_id = %group_id,
        owner_id = %ctx.user_id,
        name = %wishlist.name,
        "Wishlist created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateWishlistResponse {
            id: wishlist.id,
            group_id: wishlist.group_id,
            owner_id: wishlist.owner_id,
            name: wishlist.name,
            is_default: wishlist.is_default,
            created_at: wishlist.created_at,
        }),
    ))
}

/// List the wishlists of a group, with items and visible claims.
///
/// GET /api/v1/groups/:group_id/wishlists
///
/// Claim visibility is applied per wishlist: the owner of each list
/// sees only claims past their reveal date, other members see all of
/// them, and a claimer always sees their own.
pub async fn list_wishlists(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ListWishlistsResponse>, ApiError> {
    let group_repo = GroupRepository::new(state.pool.clone());
    let membership = group_repo
        .get_membership(group_id, ctx.user_id)
        .await?
        .map(domain::models::Membership::from);
    authorize_group_action(ctx.context(), resolve_role(membership.as_ref()), GroupAction::View)?;

    let wishlist_repo = WishlistRepository::new(state.pool.clone());
    let item_repo = ItemRepository::new(state.pool.clone());
    let claim_repo = ClaimRepository::new(state.pool.clone());

    let wishlists = wishlist_repo.list_by_group(group_id).await?;
    let wishlist_ids: Vec<Uuid> = wishlists.iter().map(|w| w.id).collect();

    let items = item_repo.list_by_wishlists(&wishlist_ids).await?;
    let claims = claim_repo.list_by_wishlists(&wishlist_ids).await?;

    let mut items_by_wishlist: HashMap<Uuid, Vec<ItemEntity>> = HashMap::new();
    for item in items {
        items_by_wishlist
            .entry(item.wishlist_id)
            .or_default()
            .push(item);
    }

    let mut claims_by_item: HashMap<Uuid, Vec<ClaimWithClaimerEntity>> = HashMap::new();
    for claim in claims {
        claims_by_item.entry(claim.item_id).or_default().push(claim);
    }

    let now = Utc::now();
    let data: Vec<WishlistSummary> = wishlists
        .into_iter()
        .map(|w| {
            let items = items_by_wishlist
                .remove(&w.id)
                .unwrap_or_default()
                .into_iter()
                .map(|item| {
                    let visible: Vec<ClaimView> = claims_by_item
                        .get(&item.id)
                        .map(|entries| {
                            entries
                                .iter()
                                .filter(|entry| {
                                    let claim: domain::models::Claim = (*entry).clone().into();
                                    claim_visible(&claim, ctx.user_id, w.owner_id, now)
                                })
                                .map(|entry| ClaimView {
                                    id: entry.id,
                                    item_id: entry.item_id,
                                    claimer_id: entry.claimer_id,
                                    claimer_name: entry.claimer_name.clone(),
                                    reveal_at: entry.reveal_at,
                                    note: entry.note.clone(),
                                    created_at: entry.created_at,
                                })
                                .collect()
                        })
                        .unwrap_or_default();

                    ItemResponse {
                        id: item.id,
                        wishlist_id: item.wishlist_id,
                        title: item.title,
                        url: item.url,
                        price: item.price,
                        currency: item.currency,
                        image_url: item.image_url,
                        note: item.note,
                        quantity: item.quantity,
                        allow_multiple_claims: item.allow_multiple_claims,
                        claimed: !visible.is_empty(),
                        claims: visible,
                        created_at: item.created_at,
                    }
                })
                .collect();

            WishlistSummary {
                id: w.id,
                owner_id: w.owner_id,
                owner_name: w.owner_name,
                name: w.name,
                is_default: w.is_default,
                items,
            }
        })
        .collect();

    Ok(Json(ListWishlistsResponse { data }))
}

/// Delete a wishlist.
///
/// DELETE /api/v1/wishlists/:wishlist_id
///
/// Only the wishlist owner may delete; items and claims cascade.
pub async fn delete_wishlist(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(wishlist_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let repo = WishlistRepository::new(state.pool.clone());

    let wishlist = repo
        .find_by_id(wishlist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Wishlist not found".to_string()))?;

    if wishlist.owner_id != ctx.user_id {
        return Err(ApiError::Forbidden(
            "Only the wishlist owner can delete it".to_string(),
        ));
    }

    repo.delete(wishlist_id).await?;

    info!(
        wishlist_id = %wishlist_id,
        owner_id = %ctx.user_id,
        "Wishlist deleted"
    );

    Ok(Json(DeleteResponse {
        deleted: true,
        id: wishlist_id,
    }))
}
