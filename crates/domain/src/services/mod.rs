//! Pure decision services.
//!
//! These services hold the authorization and visibility rules as plain
//! functions over resolved inputs, so they are testable without a
//! database and callable from any transport.

pub mod authorization;
pub mod email_masking;
pub mod visibility;
