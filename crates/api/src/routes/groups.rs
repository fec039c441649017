//! Group and membership management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::group::{
    CreateGroupRequest, CreateGroupResponse, GroupDetail, GroupSummary, ListGroupsResponse,
    ListMembersQuery, ListMembersResponse, MemberResponse, MemberRole, MembershipInfo, Pagination,
    RemoveMemberResponse, UpdateMemberRoleRequest, UpdateMemberRoleResponse,
};
use domain::services::authorization::{
    authorize_group_action, authorize_member_removal, authorize_role_change, resolve_role,
    GroupAction,
};
use domain::services::email_masking::email_for;
use persistence::repositories::GroupRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Create a new group.
///
/// POST /api/v1/groups
///
/// The creator becomes the group owner.
pub async fn create_group(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    request.validate()?;

    let repo = GroupRepository::new(state.pool.clone());
    let group = repo.create_group(request.name.trim(), ctx.user_id).await?;

    info!(
        group_id = %group.id,
        group_name = %group.name,
        user_id = %ctx.user_id,
        "Group created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            id: group.id,
            name: group.name,
            created_by: group.created_by,
            created_at: group.created_at,
            member_count: 1,
            your_role: MemberRole::Owner,
        }),
    ))
}

/// List groups the current user belongs to.
///
/// GET /api/v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<ListGroupsResponse>, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());
    let groups = repo.find_user_groups(ctx.user_id).await?;

    let summaries: Vec<GroupSummary> = groups
        .into_iter()
        .map(|g| GroupSummary {
            id: g.id,
            name: g.name,
            member_count: g.member_count,
            your_role: g.role.into(),
            joined_at: g.joined_at,
        })
        .collect();

    let count = summaries.len();

    Ok(Json(ListGroupsResponse {
        data: summaries,
        count,
    }))
}

/// Get group details.
///
/// GET /api/v1/groups/:group_id
///
/// The caller must be a member of the group.
pub async fn get_group(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupDetail>, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());

    let group = repo
        .find_group_with_membership(group_id, ctx.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found or you are not a member".to_string()))?;

    let role: MemberRole = group.role.into();

    Ok(Json(GroupDetail {
        id: group.id,
        name: group.name,
        created_by: group.created_by,
        created_at: group.created_at,
        member_count: group.member_count,
        your_role: role,
        your_membership: MembershipInfo {
            id: group.membership_id,
            role,
            joined_at: group.joined_at,
        },
    }))
}

/// Delete a group.
///
/// DELETE /api/v1/groups/:group_id
///
/// Only the owner (or a global admin) can delete. Memberships,
/// wishlists, items, claims, and invitations cascade with it.
pub async fn delete_group(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());

    if repo.find_by_id(group_id).await?.is_none() {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    let membership = repo.get_membership(group_id, ctx.user_id).await?;
    let membership = membership.map(domain::models::Membership::from);
    let role = resolve_role(membership.as_ref());

    authorize_group_action(ctx.context(), role, GroupAction::DeleteGroup)?;

    repo.delete_group(group_id).await?;

    info!(
        group_id = %group_id,
        user_id = %ctx.user_id,
        "Group deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// List group members.
///
/// GET /api/v1/groups/:group_id/members
///
/// Emails are masked per the email masking policy: the caller sees
/// unmasked addresses only for themselves, or for everyone when they
/// hold owner/admin in this group or the global-admin capability.
pub async fn list_members(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(group_id): Path<Uuid>,
    Query(query): Query<ListMembersQuery>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());

    let viewer_membership = repo
        .get_membership(group_id, ctx.user_id)
        .await?
        .map(domain::models::Membership::from);
    let viewer_role = resolve_role(viewer_membership.as_ref());

    authorize_group_action(ctx.context(), viewer_role, GroupAction::View)?;

    let viewer_is_group_admin = viewer_role.map(|r| r.can_manage_members()).unwrap_or(false);

    let members = repo
        .list_members(group_id, query.per_page(), query.offset())
        .await?;
    let total = repo.count_members(group_id).await?;

    let data: Vec<MemberResponse> = members
        .into_iter()
        .map(|m| MemberResponse {
            user_id: m.user_id,
            display_name: m.display_name,
            email: email_for(ctx.context(), m.user_id, &m.email, viewer_is_group_admin),
            role: m.role.into(),
            joined_at: m.joined_at,
        })
        .collect();

    Ok(Json(ListMembersResponse {
        data,
        pagination: Pagination::new(query.page(), query.per_page(), total),
    }))
}

/// Remove a member from a group.
///
/// DELETE /api/v1/groups/:group_id/members/:user_id
///
/// Admins and owners can remove others; any member can remove
/// themselves; the owner can be removed by nobody.
pub async fn remove_member(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveMemberResponse>, ApiError> {
    let repo = GroupRepository::new(state.pool.clone());

    let actor_membership = repo
        .get_membership(group_id, ctx.user_id)
        .await?
        .map(domain::models::Membership::from);
    let actor_role = resolve_role(actor_membership.as_ref());

    let target_membership = repo
        .get_membership(group_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;
    let target_role: MemberRole = target_membership.role.into();

    authorize_member_removal(ctx.context(), actor_role, user_id, target_role)?;

    repo.remove_member(group_id, user_id).await?;

    info!(
        group_id = %group_id,
        removed_user_id = %user_id,
        actor_id = %ctx.user_id,
        "Member removed from group"
    );

    Ok(Json(RemoveMemberResponse {
        removed: true,
        user_id,
        group_id,
    }))
}

/// Update a member's role within a group.
///
/// PUT /api/v1/groups/:group_id/members/:user_id/role
///
/// Admin/owner only; self-changes and owner-role changes need the
/// global-admin capability. Ownership is never assigned here.
pub async fn update_member_role(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<Json<UpdateMemberRoleResponse>, ApiError> {
    if request.role == MemberRole::Owner {
        return Err(ApiError::Validation(
            "Role must be admin or member".to_string(),
        ));
    }

    let repo = GroupRepository::new(state.pool.clone());

    let actor_membership = repo
        .get_membership(group_id, ctx.user_id)
        .await?
        .map(domain::models::Membership::from);
    let actor_role = resolve_role(actor_membership.as_ref());

    let target_membership = repo
        .get_membership(group_id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;
    let target_role: MemberRole = target_membership.role.into();

    authorize_role_change(ctx.context(), actor_role, user_id, target_role)?;

    let updated = repo
        .update_member_role(group_id, user_id, request.role)
        .await?;

    info!(
        group_id = %group_id,
        target_user_id = %user_id,
        new_role = %request.role,
        actor_id = %ctx.user_id,
        "Member role updated"
    );

    Ok(Json(UpdateMemberRoleResponse {
        user_id: updated.user_id,
        group_id: updated.group_id,
        role: updated.role.into(),
    }))
}
