//! Session authentication middleware.
//!
//! Validates the Bearer session token issued by the auth provider and
//! exposes the authenticated identity to downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use shared::jwt::JwtConfig;

/// Authenticated session information extracted from the token.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// User ID from the token subject claim.
    pub user_id: Uuid,
    /// Account email carried in the token.
    pub email: String,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl SessionUser {
    /// Validates a session token and returns the session identity.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_session_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(SessionUser {
            user_id,
            email: claims.email,
            jti: claims.jti,
        })
    }

    /// Creates a JwtConfig from the app's JwtAuthConfig.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.session_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }
}

/// Middleware that requires a valid session token.
///
/// Validates the Bearer token in the Authorization header and rejects
/// requests without one. The session identity is stored in request
/// extensions for downstream extractors.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let jwt_config = match SessionUser::create_jwt_config(&state.config.jwt) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to create JWT config: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    match SessionUser::validate(&jwt_config, token) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Session validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Helper to create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create an internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_validate_roundtrip() {
        let jwt_config = JwtConfig::new_symmetric("test_secret_key_for_session_tests", 900);
        let user_id = Uuid::new_v4();
        let (token, jti) = jwt_config
            .generate_session_token(user_id, "alice@example.com")
            .unwrap();

        let session = SessionUser::validate(&jwt_config, &token).unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.email, "alice@example.com");
        assert_eq!(session.jti, jti);
    }

    #[test]
    fn test_session_user_validate_rejects_garbage() {
        let jwt_config = JwtConfig::new_symmetric("test_secret_key_for_session_tests", 900);
        assert!(SessionUser::validate(&jwt_config, "not-a-token").is_err());
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = unauthorized_response("nope");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
