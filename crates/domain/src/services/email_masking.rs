//! Email masking policy.
//!
//! Email is a protected field; this policy decides which viewers get
//! the unmasked value. The masked format keeps the first character of
//! the local part and the full domain. The format is presentation, the
//! branch choosing it is the boundary.

use uuid::Uuid;

use crate::services::authorization::RequestContext;

/// Mask an email address: first character of the local part preserved,
/// remainder redacted, domain intact.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// Return the email a viewer may see for a subject.
///
/// Unmasked when the viewer is the subject, holds the global-admin
/// capability, or is an owner/admin of a group the subject belongs to
/// (`admin_shares_group`). Everyone else gets the masked form.
pub fn email_for(
    ctx: &RequestContext,
    subject_id: Uuid,
    subject_email: &str,
    admin_shares_group: bool,
) -> String {
    if ctx.user_id == subject_id || ctx.is_global_admin || admin_shares_group {
        subject_email.to_string()
    } else {
        mask_email(subject_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: Uuid, is_global_admin: bool) -> RequestContext {
        RequestContext::new(user_id, "viewer@example.com", is_global_admin)
    }

    #[test]
    fn test_mask_email_format() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("b@shop.example"), "b***@shop.example");
        assert_eq!(mask_email("no-at-sign"), "***");
        assert_eq!(mask_email("@example.com"), "***@example.com");
    }

    #[test]
    fn test_subject_sees_own_email() {
        let subject = Uuid::new_v4();
        let ctx = ctx(subject, false);
        assert_eq!(
            email_for(&ctx, subject, "alice@example.com", false),
            "alice@example.com"
        );
    }

    #[test]
    fn test_global_admin_sees_unmasked() {
        let ctx = ctx(Uuid::new_v4(), true);
        assert_eq!(
            email_for(&ctx, Uuid::new_v4(), "alice@example.com", false),
            "alice@example.com"
        );
    }

    #[test]
    fn test_group_admin_sees_unmasked() {
        let ctx = ctx(Uuid::new_v4(), false);
        assert_eq!(
            email_for(&ctx, Uuid::new_v4(), "alice@example.com", true),
            "alice@example.com"
        );
    }

    #[test]
    fn test_plain_member_sees_masked() {
        let ctx = ctx(Uuid::new_v4(), false);
        assert_eq!(
            email_for(&ctx, Uuid::new_v4(), "alice@example.com", false),
            "a***@example.com"
        );
    }
}
