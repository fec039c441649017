//! Database entity definitions (row mappings).

pub mod claim;
pub mod group;
pub mod invitation;
pub mod item;
pub mod profile;
pub mod wishlist;

pub use claim::{ClaimEntity, ClaimWithClaimerEntity};
pub use group::{
    GroupEntity, GroupWithMembershipEntity, MemberRoleDb, MemberWithProfileEntity,
    MembershipEntity,
};
pub use invitation::{InvitationEntity, InvitationWithGroupEntity};
pub use item::{ItemClaimContextEntity, ItemEntity, ItemWithOwnerEntity};
pub use profile::ProfileEntity;
pub use wishlist::{WishlistEntity, WishlistWithOwnerEntity};
