//! Profile domain models.
//!
//! Profiles mirror auth-provider users for application use. The email
//! field is a protected attribute; handler code must pass it through
//! the email masking policy before it reaches a response DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-side mirror of an auth-provider user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_global_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile response with the email already run through the masking policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
}

/// Response after deleting a user account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeleteUserResponse {
    pub deleted: bool,
    pub user_id: Uuid,
}

/// Request to update a user's role or global-admin capability.
///
/// With `group_id` set, changes the user's role in that group; `role`
/// is then required. With `group_id` absent, sets or clears the
/// global-admin capability; `is_global_admin` is then required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUpdateRoleRequest {
    pub group_id: Option<Uuid>,
    pub role: Option<super::group::MemberRole>,
    pub is_global_admin: Option<bool>,
}

/// Response after an admin role update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AdminUpdateRoleResponse {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<super::group::MemberRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_global_admin: Option<bool>,
}
