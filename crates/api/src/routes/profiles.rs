//! Profile routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::profile::ProfileResponse;
use domain::services::email_masking::email_for;
use persistence::repositories::ProfileRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthContext;

/// Get a user's profile.
///
/// GET /api/v1/profiles/:user_id
///
/// Visible to the subject, global admins, and anyone sharing a group
/// with the subject. The email field goes through the masking policy:
/// unmasked only for the subject themselves, global admins, and
/// owners/admins of a shared group.
pub async fn get_profile(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());

    let profile = repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let is_self = ctx.user_id == user_id;
    if !is_self && !ctx.is_global_admin && !repo.shares_group(ctx.user_id, user_id).await? {
        // Strangers learn nothing, not even that the profile exists.
        return Err(ApiError::NotFound("Profile not found".to_string()));
    }

    let admin_shares_group = if is_self || ctx.is_global_admin {
        false // email_for already grants these viewers the full address
    } else {
        repo.shares_group_as_admin(ctx.user_id, user_id).await?
    };

    Ok(Json(ProfileResponse {
        id: profile.id,
        email: email_for(ctx.context(), user_id, &profile.email, admin_shares_group),
        display_name: profile.display_name,
    }))
}
