//! Repository implementations for database access.

pub mod claim;
pub mod group;
pub mod invitation;
pub mod item;
pub mod profile;
pub mod wishlist;

pub use claim::{ClaimRepository, ClaimStoreError};
pub use group::GroupRepository;
pub use invitation::InvitationRepository;
pub use item::ItemRepository;
pub use profile::ProfileRepository;
pub use wishlist::{WishlistRepository, AUTO_NAME_MAX_ATTEMPTS};

/// Returns true if the error is a Postgres unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
