//! Invitation routes: create, validate, and accept.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::invitation::{
    default_invitation_expiry, AcceptInvitationResponse, CreateInvitationRequest,
    CreateInvitationResponse, InvitationStatus, ValidateInvitationResponse,
};
use domain::services::authorization::{authorize_group_action, resolve_role, GroupAction};
use persistence::repositories::{GroupRepository, InvitationRepository, ProfileRepository};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Create a new invitation and send the invite email.
///
/// POST /api/v1/groups/:group_id/invitations
///
/// Any group member may invite. The token is generated once and never
/// reissued.
pub async fn create_invitation(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(group_id): Path<Uuid>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<CreateInvitationResponse>), ApiError> {
    request.validate()?;

    let group_repo = GroupRepository::new(state.pool.clone());
    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let profile_repo = ProfileRepository::new(state.pool.clone());

    let membership = group_repo
        .get_membership(group_id, ctx.user_id)
        .await?
        .map(domain::models::Membership::from);
    authorize_group_action(ctx.context(), resolve_role(membership.as_ref()), GroupAction::InviteMember)?;

    let group = group_repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    // Reject invitations for existing members.
    if let Some(profile) = profile_repo.find_by_email(&request.email).await? {
        if group_repo.get_membership(group_id, profile.id).await?.is_some() {
            return Err(ApiError::Conflict(
                "User is already a member of this group".to_string(),
            ));
        }
    }

    if invitation_repo
        .has_pending_for_email(group_id, &request.email)
        .await?
    {
        return Err(ApiError::Conflict(
            "A pending invitation already exists for this email".to_string(),
        ));
    }

    let token = Uuid::new_v4();
    let expires_at = default_invitation_expiry();

    let invitation = invitation_repo
        .create(group_id, &request.email, token, ctx.user_id, expires_at)
        .await?;

    let invite_url = format!("{}/invite/{}", state.config.server.app_base_url, token);

    // Email delivery is best-effort; the invitation stands either way
    // and the inviter still gets the link to share.
    if let Err(e) = state
        .email
        .send_invitation_email(
            &request.email,
            &group.name,
            ctx.display_name.as_deref(),
            &invite_url,
        )
        .await
    {
        warn!(
            invitation_id = %invitation.id,
            error = %e,
            "Failed to send invitation email"
        );
    }

    info!(
        group_id = %group_id,
        invitation_id = %invitation.id,
        invited_by = %ctx.user_id,
        "Invitation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationResponse {
            id: invitation.id,
            group_id: invitation.group_id,
            email: invitation.email,
            token,
            invite_url,
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        }),
    ))
}

/// Validate an invitation token.
///
/// GET /api/v1/invitations/validate/:token
///
/// Public: the invitee has no session yet. The lookup runs with full
/// store privileges and returns only what the accept screen needs,
/// never the token itself.
pub async fn validate_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ValidateInvitationResponse>, ApiError> {
    let token: Uuid = token
        .parse()
        .map_err(|_| ApiError::Validation("Malformed invitation token".to_string()))?;

    let repo = InvitationRepository::new(state.pool.clone());
    let invitation = repo
        .find_by_token(token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let now = Utc::now();
    let domain_invitation: domain::models::Invitation = invitation.clone().into();
    let status = domain_invitation.status_at(now);

    Ok(Json(ValidateInvitationResponse {
        id: invitation.id,
        group_id: invitation.group_id,
        group_name: invitation.group_name,
        invitee_email: invitation.email,
        status,
        is_valid: status == InvitationStatus::Pending,
        is_expired: status == InvitationStatus::Expired,
        expires_at: invitation.expires_at,
    }))
}

/// Accept an invitation.
///
/// POST /api/v1/invitations/:invitation_id/accept
///
/// The session email must equal the invited email exactly, as stored.
/// Accepting is idempotent: a second accept by the same (now member)
/// user is a success no-op, so double submissions and network retries
/// do not surface errors.
pub async fn accept_invitation(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<AcceptInvitationResponse>, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());

    let invitation = repo
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if invitation.email != ctx.email {
        return Err(ApiError::Forbidden(
            "This invitation was issued to a different email address".to_string(),
        ));
    }

    let domain_invitation: domain::models::Invitation = invitation.clone().into();
    match domain_invitation.status_at(Utc::now()) {
        InvitationStatus::Accepted => {
            if invitation.accepted_by == Some(ctx.user_id) {
                // Idempotent re-accept by the same user.
                return Ok(Json(AcceptInvitationResponse {
                    group_id: invitation.group_id,
                    already_member: true,
                }));
            }
            Err(ApiError::Conflict(
                "Invitation has already been accepted".to_string(),
            ))
        }
        InvitationStatus::Expired => Err(ApiError::Validation(
            "Invitation has expired".to_string(),
        )),
        InvitationStatus::Pending => {
            let newly_accepted = repo.accept(invitation_id, ctx.user_id).await?;

            info!(
                invitation_id = %invitation_id,
                group_id = %invitation.group_id,
                user_id = %ctx.user_id,
                newly_accepted = newly_accepted,
                "Invitation accepted"
            );

            // A lost race with our own retry still means the caller is
            // a member now.
            Ok(Json(AcceptInvitationResponse {
                group_id: invitation.group_id,
                already_member: !newly_accepted,
            }))
        }
    }
}
