//! Axum extractors.

pub mod context;

pub use context::AuthContext;
