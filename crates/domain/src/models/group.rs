//! Group domain models for gift-list groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role within a group.
///
/// Roles are stored as mutually exclusive values; a member holds exactly
/// one of them per group. Owner and admin differ in privilege but neither
/// implies the other in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }

    /// Returns true if this role can manage members (invite, remove, change roles)
    pub fn can_manage_members(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }

    /// Returns true if this role can delete the group
    pub fn can_delete_group(&self) -> bool {
        matches!(self, MemberRole::Owner)
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(MemberRole::Owner),
            "admin" => Ok(MemberRole::Admin),
            "member" => Ok(MemberRole::Member),
            _ => Err(format!("Invalid member role: {}", s)),
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a gift-list group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a user's membership in a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Membership {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Request payload for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: String,
}

/// Response for creating a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateGroupResponse {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
    pub your_role: MemberRole,
}

/// Response for group listing (minimal info).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub your_role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Response for listing groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListGroupsResponse {
    pub data: Vec<GroupSummary>,
    pub count: usize,
}

/// Response for group detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GroupDetail {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
    pub your_role: MemberRole,
    pub your_membership: MembershipInfo,
}

/// Basic membership info for group responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MembershipInfo {
    pub id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Query parameters for listing members.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListMembersQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListMembersQuery {
    /// Get the page number (1-indexed).
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page (clamped to 1-100).
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(50).clamp(1, 100)
    }

    /// Get the offset for pagination.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Pagination info for list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = (total + per_page - 1) / per_page;
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Member response in list.
///
/// The email field is already masked (or not) per the email masking
/// policy by the time this DTO is built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberResponse {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub email: String,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Response for listing members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMembersResponse {
    pub data: Vec<MemberResponse>,
    pub pagination: Pagination,
}

/// Response when removing a member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoveMemberResponse {
    pub removed: bool,
    pub user_id: Uuid,
    pub group_id: Uuid,
}

/// Request to update a member's role within a group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMemberRoleRequest {
    pub role: MemberRole,
}

/// Response after updating a member's role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMemberRoleResponse {
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub role: MemberRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_as_str() {
        assert_eq!(MemberRole::Owner.as_str(), "owner");
        assert_eq!(MemberRole::Admin.as_str(), "admin");
        assert_eq!(MemberRole::Member.as_str(), "member");
    }

    #[test]
    fn test_member_role_from_str() {
        assert_eq!(MemberRole::from_str("owner").unwrap(), MemberRole::Owner);
        assert_eq!(MemberRole::from_str("ADMIN").unwrap(), MemberRole::Admin);
        assert_eq!(MemberRole::from_str("Member").unwrap(), MemberRole::Member);
        assert!(MemberRole::from_str("viewer").is_err());
    }

    #[test]
    fn test_member_role_display() {
        assert_eq!(format!("{}", MemberRole::Owner), "owner");
        assert_eq!(format!("{}", MemberRole::Admin), "admin");
    }

    #[test]
    fn test_member_role_permissions() {
        assert!(MemberRole::Owner.can_manage_members());
        assert!(MemberRole::Owner.can_delete_group());

        assert!(MemberRole::Admin.can_manage_members());
        assert!(!MemberRole::Admin.can_delete_group());

        assert!(!MemberRole::Member.can_manage_members());
        assert!(!MemberRole::Member.can_delete_group());
    }

    #[test]
    fn test_create_group_request_validation() {
        let valid = CreateGroupRequest {
            name: "Smith Family".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateGroupRequest {
            name: "".to_string(),
        };
        assert!(empty.validate().is_err());

        let oversized = CreateGroupRequest {
            name: "x".repeat(201),
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_list_members_query_defaults() {
        let query = ListMembersQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 50);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_list_members_query_clamping() {
        let query = ListMembersQuery {
            page: Some(-3),
            per_page: Some(500),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
    }

    #[test]
    fn test_pagination_new() {
        let pagination = Pagination::new(2, 25, 75);
        assert_eq!(pagination.total_pages, 3);

        let uneven = Pagination::new(1, 10, 11);
        assert_eq!(uneven.total_pages, 2);
    }
}
