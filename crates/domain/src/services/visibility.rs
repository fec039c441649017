//! Claim visibility engine.
//!
//! Reveal dates protect the surprise from the wishlist owner only.
//! Every other group member always sees every claim, so shoppers can
//! avoid buying the same single-claim item twice. This asymmetry is
//! deliberate product behavior; do not tighten it into general claim
//! privacy.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::claim::Claim;

/// Reasons a claim attempt is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClaimDenied {
    #[error("You cannot claim an item on your own wishlist")]
    OwnItem,

    #[error("You have already claimed this item")]
    AlreadyClaimedByYou,

    #[error("This item has already been claimed")]
    AlreadyClaimed,
}

/// Reasons an unclaim attempt is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnclaimDenied {
    #[error("Only the claimer can remove a claim")]
    NotClaimer,
}

/// Decide whether a single claim is visible to a viewer.
///
/// Rules, in order:
/// 1. the claimer always sees their own claim;
/// 2. the wishlist owner sees a claim only once its reveal date has
///    passed; before that, the claim does not exist from the owner's
///    point of view;
/// 3. any other viewer sees the claim unconditionally.
pub fn claim_visible(
    claim: &Claim,
    viewer_id: Uuid,
    wishlist_owner_id: Uuid,
    now: DateTime<Utc>,
) -> bool {
    if claim.claimer_id == viewer_id {
        return true;
    }
    if viewer_id == wishlist_owner_id {
        return now >= claim.reveal_at;
    }
    true
}

/// Filter a claim set down to what the viewer may see.
///
/// For the owner, claims with future reveal dates are elided entirely,
/// not redacted: the result carries no hint that a hidden claim exists.
pub fn visible_claims(
    claims: &[Claim],
    viewer_id: Uuid,
    wishlist_owner_id: Uuid,
    now: DateTime<Utc>,
) -> Vec<Claim> {
    claims
        .iter()
        .filter(|c| claim_visible(c, viewer_id, wishlist_owner_id, now))
        .cloned()
        .collect()
}

/// Decide whether a claim attempt is permitted.
///
/// `existing` must hold every live claim on the item, unfiltered.
/// The claimer's own prior unclaim leaves no row behind, so an
/// unclaim-then-reclaim by a new user passes.
pub fn authorize_claim(
    claimer_id: Uuid,
    wishlist_owner_id: Uuid,
    allow_multiple_claims: bool,
    existing: &[Claim],
) -> Result<(), ClaimDenied> {
    if claimer_id == wishlist_owner_id {
        return Err(ClaimDenied::OwnItem);
    }
    if existing.iter().any(|c| c.claimer_id == claimer_id) {
        return Err(ClaimDenied::AlreadyClaimedByYou);
    }
    if !allow_multiple_claims && !existing.is_empty() {
        return Err(ClaimDenied::AlreadyClaimed);
    }
    Ok(())
}

/// Decide whether a viewer may delete a claim.
///
/// Only the original claimer qualifies; the wishlist owner never does.
pub fn authorize_unclaim(claim: &Claim, viewer_id: Uuid) -> Result<(), UnclaimDenied> {
    if claim.claimer_id == viewer_id {
        Ok(())
    } else {
        Err(UnclaimDenied::NotClaimer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claim(claimer_id: Uuid, reveal_at: DateTime<Utc>) -> Claim {
        Claim {
            id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            claimer_id,
            reveal_at,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_does_not_see_future_reveal() {
        let owner = Uuid::new_v4();
        let claimer = Uuid::new_v4();
        let now = Utc::now();
        let c = claim(claimer, now + Duration::days(1));

        assert!(!claim_visible(&c, owner, owner, now));
    }

    #[test]
    fn test_owner_sees_claim_after_reveal() {
        let owner = Uuid::new_v4();
        let claimer = Uuid::new_v4();
        let now = Utc::now();
        let c = claim(claimer, now - Duration::hours(1));

        assert!(claim_visible(&c, owner, owner, now));
    }

    #[test]
    fn test_owner_sees_claim_at_exact_reveal_instant() {
        let owner = Uuid::new_v4();
        let claimer = Uuid::new_v4();
        let now = Utc::now();
        let c = claim(claimer, now);

        assert!(claim_visible(&c, owner, owner, now));
    }

    #[test]
    fn test_other_member_always_sees_claim() {
        let owner = Uuid::new_v4();
        let claimer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let now = Utc::now();
        let c = claim(claimer, now + Duration::days(30));

        assert!(claim_visible(&c, other, owner, now));
    }

    #[test]
    fn test_claimer_always_sees_own_claim() {
        let owner = Uuid::new_v4();
        let claimer = Uuid::new_v4();
        let now = Utc::now();
        let c = claim(claimer, now + Duration::days(30));

        assert!(claim_visible(&c, claimer, owner, now));
    }

    #[test]
    fn test_visible_claims_elides_hidden_for_owner() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let hidden = claim(Uuid::new_v4(), now + Duration::days(1));
        let revealed = claim(Uuid::new_v4(), now - Duration::days(1));

        let owner_view = visible_claims(
            &[hidden.clone(), revealed.clone()],
            owner,
            owner,
            now,
        );
        assert_eq!(owner_view.len(), 1);
        assert_eq!(owner_view[0].id, revealed.id);

        // The same set is fully visible to another member.
        let member_view = visible_claims(&[hidden, revealed], Uuid::new_v4(), owner, now);
        assert_eq!(member_view.len(), 2);
    }

    #[test]
    fn test_authorize_claim_single_claim_conflict() {
        let owner = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let existing = vec![claim(first, Utc::now() + Duration::days(1))];

        assert_eq!(
            authorize_claim(second, owner, false, &existing),
            Err(ClaimDenied::AlreadyClaimed)
        );
    }

    #[test]
    fn test_authorize_claim_multiple_allowed() {
        let owner = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let existing = vec![claim(first, Utc::now() + Duration::days(1))];

        assert!(authorize_claim(second, owner, true, &existing).is_ok());
    }

    #[test]
    fn test_authorize_claim_after_unclaim() {
        // Once the first claim is gone, a second claimer may take it.
        let owner = Uuid::new_v4();
        let second = Uuid::new_v4();
        assert!(authorize_claim(second, owner, false, &[]).is_ok());
    }

    #[test]
    fn test_authorize_claim_duplicate_by_same_user() {
        let owner = Uuid::new_v4();
        let claimer = Uuid::new_v4();
        let existing = vec![claim(claimer, Utc::now() + Duration::days(1))];

        assert_eq!(
            authorize_claim(claimer, owner, true, &existing),
            Err(ClaimDenied::AlreadyClaimedByYou)
        );
    }

    #[test]
    fn test_authorize_claim_own_item() {
        let owner = Uuid::new_v4();
        assert_eq!(
            authorize_claim(owner, owner, true, &[]),
            Err(ClaimDenied::OwnItem)
        );
    }

    #[test]
    fn test_authorize_unclaim_claimer_only() {
        let claimer = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let c = claim(claimer, Utc::now() + Duration::days(1));

        assert!(authorize_unclaim(&c, claimer).is_ok());
        assert_eq!(authorize_unclaim(&c, owner), Err(UnclaimDenied::NotClaimer));
        assert_eq!(
            authorize_unclaim(&c, Uuid::new_v4()),
            Err(UnclaimDenied::NotClaimer)
        );
    }
}
