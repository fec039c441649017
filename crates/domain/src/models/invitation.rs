//! Invitation domain models for group invitations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Default expiration days for invitations.
pub const DEFAULT_EXPIRATION_DAYS: i64 = 7;

/// Represents a group invitation.
///
/// The token is immutable and never reissued; status is derived from
/// `accepted_at` and `expires_at`, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub group_id: Uuid,
    pub email: String,
    pub token: Uuid,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub accepted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Derive the invitation status at the given instant.
    ///
    /// Acceptance is terminal; a pending invitation past its expiry
    /// reads as expired even though nothing was written.
    pub fn status_at(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.accepted_at.is_some() {
            InvitationStatus::Accepted
        } else if now > self.expires_at {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }
}

/// Derived invitation status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

/// Default invitation expiry (issued + 7 days).
pub fn default_invitation_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::days(DEFAULT_EXPIRATION_DAYS)
}

/// Request to create a new invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    /// Email address of the invitee.
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
}

/// Response after creating an invitation.
///
/// The token is returned to the inviter once, for the invite link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub email: String,
    pub token: Uuid,
    pub invite_url: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Public invitation info for the unauthenticated validate endpoint.
///
/// Deliberately minimal: the invitee has no session yet, so only what
/// the accept screen needs is exposed, never the token itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidateInvitationResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub invitee_email: String,
    pub status: InvitationStatus,
    pub is_valid: bool,
    pub is_expired: bool,
    pub expires_at: DateTime<Utc>,
}

/// Response after accepting an invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInvitationResponse {
    pub group_id: Uuid,
    pub already_member: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(
        accepted_at: Option<DateTime<Utc>>,
        expires_at: DateTime<Utc>,
    ) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            email: "invitee@example.com".to_string(),
            token: Uuid::new_v4(),
            invited_by: Uuid::new_v4(),
            expires_at,
            accepted_at,
            accepted_by: accepted_at.map(|_| Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_pending() {
        let inv = invitation(None, Utc::now() + Duration::days(3));
        assert_eq!(inv.status_at(Utc::now()), InvitationStatus::Pending);
    }

    #[test]
    fn test_status_expired_overrides_pending() {
        // Nothing is written on expiry; the timestamp alone decides.
        let inv = invitation(None, Utc::now() - Duration::hours(1));
        assert_eq!(inv.status_at(Utc::now()), InvitationStatus::Expired);
    }

    #[test]
    fn test_status_accepted_is_terminal() {
        let inv = invitation(Some(Utc::now() - Duration::days(10)), Utc::now() - Duration::days(1));
        assert_eq!(inv.status_at(Utc::now()), InvitationStatus::Accepted);
    }

    #[test]
    fn test_default_invitation_expiry_seven_days() {
        let expiry = default_invitation_expiry();
        let diff = expiry - Utc::now();
        assert!(diff.num_days() >= 6 && diff.num_days() <= 7);
    }

    #[test]
    fn test_create_invitation_request_validation() {
        let valid = CreateInvitationRequest {
            email: "invitee@example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let not_an_email = CreateInvitationRequest {
            email: "not-an-email".to_string(),
        };
        assert!(not_an_email.validate().is_err());

        let oversized = CreateInvitationRequest {
            email: format!("{}@example.com", "x".repeat(250)),
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_invitation_status_serialization() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Accepted).unwrap(),
            "\"accepted\""
        );
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Expired).unwrap(),
            "\"expired\""
        );
    }
}
