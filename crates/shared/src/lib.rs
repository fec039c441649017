//! Shared utilities and common types for the Under Wraps backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT session token utilities
//! - Common validation logic

pub mod jwt;
pub mod validation;
