//! Global administration routes.
//!
//! These moderation actions require the global-admin capability, which
//! is a profile-level flag independent of any group role.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::group::MemberRole;
use domain::models::profile::{AdminUpdateRoleRequest, AdminUpdateRoleResponse, DeleteUserResponse};
use domain::services::authorization::{authorize_role_change, resolve_role};
use persistence::repositories::{GroupRepository, ProfileRepository};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

fn require_global_admin(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.is_global_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Global administrator capability required".to_string(),
        ))
    }
}

/// Delete a user account.
///
/// DELETE /api/v1/admin/users/:user_id
///
/// Global admin only; self-deletion is rejected. This is the only path
/// that removes a group owner, via cascade of everything they own.
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    require_global_admin(&ctx)?;

    if user_id == ctx.user_id {
        return Err(ApiError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }

    let repo = ProfileRepository::new(state.pool.clone());
    let deleted = repo.delete(user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(
        deleted_user_id = %user_id,
        actor_id = %ctx.user_id,
        "User account deleted"
    );

    Ok(Json(DeleteUserResponse {
        deleted: true,
        user_id,
    }))
}

/// Update a user's group role or global-admin capability.
///
/// PUT /api/v1/admin/users/:user_id/role
///
/// With a group id, changes the user's role in that group (a global
/// admin may alter even the owner's role). Without one, sets or clears
/// the global-admin capability; admins cannot change their own.
pub async fn update_user_role(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AdminUpdateRoleRequest>,
) -> Result<Json<AdminUpdateRoleResponse>, ApiError> {
    require_global_admin(&ctx)?;

    match request.group_id {
        Some(group_id) => {
            let role = request.role.ok_or_else(|| {
                ApiError::Validation("role is required when group_id is set".to_string())
            })?;

            let group_repo = GroupRepository::new(state.pool.clone());

            let actor_membership = group_repo
                .get_membership(group_id, ctx.user_id)
                .await?
                .map(domain::models::Membership::from);
            let target_membership = group_repo
                .get_membership(group_id, user_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;
            let target_role: MemberRole = target_membership.role.into();

            authorize_role_change(
                ctx.context(),
                resolve_role(actor_membership.as_ref()),
                user_id,
                target_role,
            )?;

            let updated = group_repo
                .update_member_role(group_id, user_id, role)
                .await?;

            info!(
                group_id = %group_id,
                target_user_id = %user_id,
                new_role = %role,
                actor_id = %ctx.user_id,
                "Member role updated by global admin"
            );

            Ok(Json(AdminUpdateRoleResponse {
                user_id,
                group_id: Some(group_id),
                role: Some(updated.role.into()),
                is_global_admin: None,
            }))
        }
        None => {
            let is_global_admin = request.is_global_admin.ok_or_else(|| {
                ApiError::Validation(
                    "is_global_admin is required when group_id is not set".to_string(),
                )
            })?;

            if user_id == ctx.user_id {
                return Err(ApiError::Forbidden(
                    "You cannot change your own global administrator capability".to_string(),
                ));
            }

            let repo = ProfileRepository::new(state.pool.clone());
            let updated = repo.set_global_admin(user_id, is_global_admin).await?;
            if updated == 0 {
                return Err(ApiError::NotFound("User not found".to_string()));
            }

            info!(
                target_user_id = %user_id,
                is_global_admin = is_global_admin,
                actor_id = %ctx.user_id,
                "Global administrator capability updated"
            );

            Ok(Json(AdminUpdateRoleResponse {
                user_id,
                group_id: None,
                role: None,
                is_global_admin: Some(is_global_admin),
            }))
        }
    }
}
