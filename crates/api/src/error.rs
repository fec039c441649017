use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::authorization::AccessDenied;
use domain::services::visibility::{ClaimDenied, UnclaimDenied};
use persistence::repositories::claim::ClaimStoreError;
use persistence::repositories::wishlist::WishlistCreateError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                // Log the detail server-side; the client gets a generic message.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    format!(
                        "{}: {}",
                        field,
                        err.message.as_ref().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();

        ApiError::Validation(messages.join(", "))
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            // Membership is not disclosed to outsiders.
            AccessDenied::NotMember => {
                ApiError::NotFound("Group not found or you are not a member".into())
            }
            other => ApiError::Forbidden(other.to_string()),
        }
    }
}

impl From<ClaimDenied> for ApiError {
    fn from(denied: ClaimDenied) -> Self {
        match denied {
            ClaimDenied::OwnItem => ApiError::Forbidden(denied.to_string()),
            ClaimDenied::AlreadyClaimedByYou | ClaimDenied::AlreadyClaimed => {
                ApiError::Conflict(denied.to_string())
            }
        }
    }
}

impl From<UnclaimDenied> for ApiError {
    fn from(denied: UnclaimDenied) -> Self {
        ApiError::Forbidden(denied.to_string())
    }
}

impl From<ClaimStoreError> for ApiError {
    fn from(err: ClaimStoreError) -> Self {
        match err {
            ClaimStoreError::ItemNotFound => ApiError::NotFound("Item not found".into()),
            ClaimStoreError::Denied(denied) => denied.into(),
            ClaimStoreError::Database(e) => e.into(),
        }
    }
}

impl From<WishlistCreateError> for ApiError {
    fn from(err: WishlistCreateError) -> Self {
        match err {
            WishlistCreateError::DuplicateName => ApiError::Conflict(err.to_string()),
            WishlistCreateError::AutoNameExhausted(_) => ApiError::Conflict(err.to_string()),
            WishlistCreateError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_api_error_unauthorized() {
        let error = ApiError::Unauthorized("test message".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_forbidden() {
        let error = ApiError::Forbidden("access denied".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_api_error_not_found() {
        let error = ApiError::NotFound("resource not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_error_conflict() {
        let error = ApiError::Conflict("already exists".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_api_error_validation() {
        let error = ApiError::Validation("invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_internal() {
        let error = ApiError::Internal("database connection failed".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_access_denied_not_member_is_not_found() {
        // Non-members learn nothing about the group's existence.
        let error: ApiError = AccessDenied::NotMember.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_from_access_denied_admin_required_is_forbidden() {
        let error: ApiError = AccessDenied::RequiresAdmin.into();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_from_claim_denied() {
        let error: ApiError = ClaimDenied::AlreadyClaimed.into();
        assert!(matches!(error, ApiError::Conflict(_)));

        let error: ApiError = ClaimDenied::OwnItem.into();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_from_unclaim_denied() {
        let error: ApiError = UnclaimDenied::NotClaimer.into();
        assert!(matches!(error, ApiError::Forbidden(_)));
    }
}
