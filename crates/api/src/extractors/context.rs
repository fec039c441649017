//! Request context extractor.
//!
//! Builds the per-request [`RequestContext`] once from the session
//! token and the caller's profile row. Handlers receive the context as
//! an explicit argument and thread it into every authorization check;
//! there is no ambient current-user state.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::ops::Deref;

use domain::services::authorization::RequestContext;
use persistence::repositories::ProfileRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::SessionUser;

/// Authenticated request context with the caller's profile resolved.
///
/// Derefs to [`RequestContext`], so `ctx.user_id`, `ctx.email`, and
/// `ctx.is_global_admin` are available directly.
#[derive(Debug, Clone)]
pub struct AuthContext {
    context: RequestContext,
    /// Display name from the profile, used for auto-naming defaults.
    pub display_name: Option<String>,
}

impl AuthContext {
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl Deref for AuthContext {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Session identity: from middleware extensions, or validated here
        // for routes mounted without the session layer.
        let session = if let Some(session) = parts.extensions.get::<SessionUser>() {
            session.clone()
        } else {
            let auth_header = parts
                .headers
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    ApiError::Unauthorized("Missing Authorization header".to_string())
                })?;

            if !auth_header.starts_with("Bearer ") {
                return Err(ApiError::Unauthorized(
                    "Invalid Authorization header format".to_string(),
                ));
            }

            let token = &auth_header[7..];

            let jwt_config =
                SessionUser::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

            SessionUser::validate(&jwt_config, token)
                .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?
        };

        // Materialize the profile mirror on first contact, then read the
        // stored email and global-admin capability from it.
        let repo = ProfileRepository::new(state.pool.clone());
        let profile = match repo.find_by_id(session.user_id).await? {
            Some(profile) => profile,
            None => repo.upsert(session.user_id, &session.email, None).await?,
        };

        Ok(AuthContext {
            context: RequestContext::new(profile.id, profile.email, profile.is_global_admin),
            display_name: profile.display_name,
        })
    }
}
