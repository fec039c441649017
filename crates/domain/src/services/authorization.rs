//! Group-scoped authorization: role resolution and the membership guard.
//!
//! Every check takes an explicit [`RequestContext`] built once per
//! request from the session credentials; there is no ambient
//! current-user state. The functions here are pure: callers resolve
//! memberships first and pass them in.

use thiserror::Error;
use uuid::Uuid;

use crate::models::group::{MemberRole, Membership};

/// Per-request identity, constructed from the session token and the
/// caller's profile.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub email: String,
    /// Global moderation capability, orthogonal to any group role.
    pub is_global_admin: bool,
}

impl RequestContext {
    pub fn new(user_id: Uuid, email: impl Into<String>, is_global_admin: bool) -> Self {
        Self {
            user_id,
            email: email.into(),
            is_global_admin,
        }
    }
}

/// Group-scoped actions subject to the membership guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    View,
    InviteMember,
    CreateWishlist,
    DeleteGroup,
}

/// Typed denial reasons; each maps onto the HTTP error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Not a member of this group")]
    NotMember,

    #[error("Requires an admin or owner role")]
    RequiresAdmin,

    #[error("Only the group owner can do this")]
    RequiresOwner,

    #[error("The group owner cannot be removed from the group")]
    OwnerNotRemovable,

    #[error("The owner's role can only be changed by a global administrator")]
    OwnerRoleProtected,

    #[error("You cannot change your own role")]
    SelfRoleChange,
}

/// Resolve the effective role a user holds in a group.
///
/// Roles are stored, not inferred: the single membership row (or its
/// absence) is the entire answer.
pub fn resolve_role(membership: Option<&Membership>) -> Option<MemberRole> {
    membership.map(|m| m.role)
}

/// Authorize a group-scoped action that has no per-target rules.
///
/// View, wishlist creation, and inviting need membership only; any
/// member may bring someone into their group. Group deletion needs the
/// owner role, or the global-admin capability.
///
/// Member removal and role changes depend on who the target is, so
/// they have their own predicates below.
pub fn authorize_group_action(
    ctx: &RequestContext,
    role: Option<MemberRole>,
    action: GroupAction,
) -> Result<(), AccessDenied> {
    match action {
        GroupAction::View | GroupAction::CreateWishlist | GroupAction::InviteMember => {
            if role.is_some() {
                Ok(())
            } else {
                Err(AccessDenied::NotMember)
            }
        }
        GroupAction::DeleteGroup => {
            if ctx.is_global_admin {
                return Ok(());
            }
            match role {
                Some(r) if r.can_delete_group() => Ok(()),
                Some(_) => Err(AccessDenied::RequiresOwner),
                None => Err(AccessDenied::NotMember),
            }
        }
    }
}

/// Authorize removing a member from a group.
///
/// Order matters: the owner is never removable through this path, not
/// even by a global admin (owner removal happens only via account
/// deletion). Self-removal is always allowed for members, bypassing
/// the admin requirement. Everything else needs admin/owner or the
/// global capability.
pub fn authorize_member_removal(
    ctx: &RequestContext,
    actor_role: Option<MemberRole>,
    target_user_id: Uuid,
    target_role: MemberRole,
) -> Result<(), AccessDenied> {
    if target_role == MemberRole::Owner {
        return Err(AccessDenied::OwnerNotRemovable);
    }
    if ctx.user_id == target_user_id {
        // Self-removal carve-out: leaving a group needs no privilege.
        return Ok(());
    }
    if ctx.is_global_admin {
        return Ok(());
    }
    match actor_role {
        Some(r) if r.can_manage_members() => Ok(()),
        Some(_) => Err(AccessDenied::RequiresAdmin),
        None => Err(AccessDenied::NotMember),
    }
}

/// Authorize changing a member's role within a group.
///
/// Self-changes and owner-role changes are reserved for global admins;
/// otherwise admin/owner in the group suffices.
pub fn authorize_role_change(
    ctx: &RequestContext,
    actor_role: Option<MemberRole>,
    target_user_id: Uuid,
    target_role: MemberRole,
) -> Result<(), AccessDenied> {
    if ctx.user_id == target_user_id && !ctx.is_global_admin {
        return Err(AccessDenied::SelfRoleChange);
    }
    if target_role == MemberRole::Owner && !ctx.is_global_admin {
        return Err(AccessDenied::OwnerRoleProtected);
    }
    if ctx.is_global_admin {
        return Ok(());
    }
    match actor_role {
        Some(r) if r.can_manage_members() => Ok(()),
        Some(_) => Err(AccessDenied::RequiresAdmin),
        None => Err(AccessDenied::NotMember),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ctx(is_global_admin: bool) -> RequestContext {
        RequestContext::new(Uuid::new_v4(), "actor@example.com", is_global_admin)
    }

    fn membership(role: MemberRole) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_role_stored_value() {
        let m = membership(MemberRole::Admin);
        assert_eq!(resolve_role(Some(&m)), Some(MemberRole::Admin));
        assert_eq!(resolve_role(None), None);
    }

    #[test]
    fn test_view_requires_membership() {
        let ctx = ctx(false);
        assert!(authorize_group_action(&ctx, Some(MemberRole::Member), GroupAction::View).is_ok());
        assert_eq!(
            authorize_group_action(&ctx, None, GroupAction::View),
            Err(AccessDenied::NotMember)
        );
    }

    #[test]
    fn test_create_wishlist_requires_membership_only() {
        let ctx = ctx(false);
        assert!(
            authorize_group_action(&ctx, Some(MemberRole::Member), GroupAction::CreateWishlist)
                .is_ok()
        );
        assert_eq!(
            authorize_group_action(&ctx, None, GroupAction::CreateWishlist),
            Err(AccessDenied::NotMember)
        );
    }

    #[test]
    fn test_invite_member_open_to_all_members() {
        let ctx = ctx(false);
        assert!(
            authorize_group_action(&ctx, Some(MemberRole::Member), GroupAction::InviteMember)
                .is_ok()
        );
        assert_eq!(
            authorize_group_action(&ctx, None, GroupAction::InviteMember),
            Err(AccessDenied::NotMember)
        );
    }

    #[test]
    fn test_delete_group_owner_only() {
        let ctx = ctx(false);
        assert!(
            authorize_group_action(&ctx, Some(MemberRole::Owner), GroupAction::DeleteGroup).is_ok()
        );
        assert_eq!(
            authorize_group_action(&ctx, Some(MemberRole::Admin), GroupAction::DeleteGroup),
            Err(AccessDenied::RequiresOwner)
        );
        assert_eq!(
            authorize_group_action(&ctx, Some(MemberRole::Member), GroupAction::DeleteGroup),
            Err(AccessDenied::RequiresOwner)
        );
    }

    #[test]
    fn test_delete_group_global_admin_bypass() {
        let ctx = ctx(true);
        assert!(authorize_group_action(&ctx, None, GroupAction::DeleteGroup).is_ok());
    }

    #[test]
    fn test_remove_member_requires_admin() {
        let ctx = ctx(false);
        let target = Uuid::new_v4();
        assert!(authorize_member_removal(
            &ctx,
            Some(MemberRole::Admin),
            target,
            MemberRole::Member
        )
        .is_ok());
        assert_eq!(
            authorize_member_removal(&ctx, Some(MemberRole::Member), target, MemberRole::Member),
            Err(AccessDenied::RequiresAdmin)
        );
        assert_eq!(
            authorize_member_removal(&ctx, None, target, MemberRole::Member),
            Err(AccessDenied::NotMember)
        );
    }

    #[test]
    fn test_remove_owner_always_denied() {
        // Admins, plain members, and even global admins: nobody removes
        // the owner through the member-removal path.
        let admin_ctx = ctx(false);
        let target = Uuid::new_v4();
        assert_eq!(
            authorize_member_removal(&admin_ctx, Some(MemberRole::Admin), target, MemberRole::Owner),
            Err(AccessDenied::OwnerNotRemovable)
        );

        let global_ctx = ctx(true);
        assert_eq!(
            authorize_member_removal(&global_ctx, None, target, MemberRole::Owner),
            Err(AccessDenied::OwnerNotRemovable)
        );
    }

    #[test]
    fn test_self_removal_carve_out() {
        let ctx = ctx(false);
        // A plain member removing themselves succeeds with no admin check.
        assert!(authorize_member_removal(
            &ctx,
            Some(MemberRole::Member),
            ctx.user_id,
            MemberRole::Member
        )
        .is_ok());
    }

    #[test]
    fn test_self_removal_does_not_apply_to_owner() {
        // Even the owner themselves cannot leave via member removal.
        let ctx = ctx(false);
        assert_eq!(
            authorize_member_removal(&ctx, Some(MemberRole::Owner), ctx.user_id, MemberRole::Owner),
            Err(AccessDenied::OwnerNotRemovable)
        );
    }

    #[test]
    fn test_global_admin_can_remove_others() {
        let ctx = ctx(true);
        let target = Uuid::new_v4();
        assert!(authorize_member_removal(&ctx, None, target, MemberRole::Admin).is_ok());
    }

    #[test]
    fn test_role_change_requires_admin() {
        let ctx = ctx(false);
        let target = Uuid::new_v4();
        assert!(authorize_role_change(
            &ctx,
            Some(MemberRole::Owner),
            target,
            MemberRole::Member
        )
        .is_ok());
        assert_eq!(
            authorize_role_change(&ctx, Some(MemberRole::Member), target, MemberRole::Member),
            Err(AccessDenied::RequiresAdmin)
        );
    }

    #[test]
    fn test_role_change_self_denied_without_global_admin() {
        let admin_ctx = ctx(false);
        assert_eq!(
            authorize_role_change(
                &admin_ctx,
                Some(MemberRole::Admin),
                admin_ctx.user_id,
                MemberRole::Admin
            ),
            Err(AccessDenied::SelfRoleChange)
        );

        let global_ctx = ctx(true);
        assert!(authorize_role_change(
            &global_ctx,
            Some(MemberRole::Admin),
            global_ctx.user_id,
            MemberRole::Admin
        )
        .is_ok());
    }

    #[test]
    fn test_owner_role_change_needs_global_admin() {
        let admin_ctx = ctx(false);
        let target = Uuid::new_v4();
        assert_eq!(
            authorize_role_change(&admin_ctx, Some(MemberRole::Admin), target, MemberRole::Owner),
            Err(AccessDenied::OwnerRoleProtected)
        );

        let global_ctx = ctx(true);
        assert!(authorize_role_change(&global_ctx, None, target, MemberRole::Owner).is_ok());
    }
}
