use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use persistence::repositories::AdmissionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Shift is full")]
    ShiftFull,

    #[error("Shift is closed")]
    ShiftClosed,

    #[error("Duplicate registration")]
    DuplicateRegistration,

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Shift has already taken place")]
    StaleShift,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

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
            ApiError::ShiftFull => (
                StatusCode::CONFLICT,
                "shift_full",
                "Shift has reached its maximum capacity".into(),
            ),
            ApiError::ShiftClosed => (
                StatusCode::CONFLICT,
                "shift_closed",
                "Shift is closed for registration".into(),
            ),
            ApiError::DuplicateRegistration => (
                StatusCode::CONFLICT,
                "duplicate_registration",
                "This email is already registered for this shift".into(),
            ),
            ApiError::PreconditionFailed(msg) => {
                (StatusCode::CONFLICT, "precondition_failed", msg.clone())
            }
            ApiError::StaleShift => (
                StatusCode::CONFLICT,
                "stale_shift",
                "Shift has already taken place".into(),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
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

        // Conflicts are expected outcomes of the lifecycle, not faults
        if status == StatusCode::CONFLICT {
            tracing::info!(code = error_code, "Request rejected: {}", message);
        }

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

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::ShiftNotFound => ApiError::NotFound("Shift not found".into()),
            AdmissionError::ShiftClosed => ApiError::ShiftClosed,
            AdmissionError::ShiftFull => ApiError::ShiftFull,
            AdmissionError::DuplicateRegistration => ApiError::DuplicateRegistration,
            AdmissionError::Database(e) => e.into(),
        }
    }
}

impl From<shared::jwt::IdentityError> for ApiError {
    fn from(err: shared::jwt::IdentityError) -> Self {
        match err {
            shared::jwt::IdentityError::TokenExpired => {
                ApiError::Unauthorized("Token has expired".into())
            }
            _ => ApiError::Unauthorized("Invalid or missing token".into()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();

        let message = match messages.as_slice() {
            [single] => single.clone(),
            _ => format!("{} validation errors", messages.len()),
        };

        ApiError::Validation(message)
    }
}

impl From<validator::ValidationError> for ApiError {
    fn from(err: validator::ValidationError) -> Self {
        let message = err
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        ApiError::Validation(message)
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
    fn test_conflict_family_maps_to_409() {
        for error in [
            ApiError::ShiftFull,
            ApiError::ShiftClosed,
            ApiError::DuplicateRegistration,
            ApiError::PreconditionFailed("state changed".to_string()),
            ApiError::StaleShift,
            ApiError::Conflict("already exists".to_string()),
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_api_error_validation() {
        let error = ApiError::Validation("invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_rate_limited() {
        let error = ApiError::RateLimited;
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_api_error_internal() {
        let error = ApiError::Internal("database connection failed".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_service_unavailable() {
        let error = ApiError::ServiceUnavailable("maintenance".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(format!("{}", ApiError::ShiftFull), "Shift is full");
        assert_eq!(format!("{}", ApiError::ShiftClosed), "Shift is closed");
        assert_eq!(
            format!("{}", ApiError::DuplicateRegistration),
            "Duplicate registration"
        );
        assert_eq!(
            format!("{}", ApiError::StaleShift),
            "Shift has already taken place"
        );
        assert_eq!(format!("{}", ApiError::RateLimited), "Rate limited");
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
    fn test_from_admission_error() {
        assert!(matches!(
            ApiError::from(AdmissionError::ShiftNotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(AdmissionError::ShiftClosed),
            ApiError::ShiftClosed
        ));
        assert!(matches!(
            ApiError::from(AdmissionError::ShiftFull),
            ApiError::ShiftFull
        ));
        assert!(matches!(
            ApiError::from(AdmissionError::DuplicateRegistration),
            ApiError::DuplicateRegistration
        ));
    }

    #[test]
    fn test_from_identity_error() {
        let expired: ApiError = shared::jwt::IdentityError::TokenExpired.into();
        match expired {
            ApiError::Unauthorized(msg) => assert!(msg.contains("expired")),
            _ => panic!("Expected Unauthorized error"),
        }

        let invalid: ApiError = shared::jwt::IdentityError::InvalidToken.into();
        assert!(matches!(invalid, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_from_validation_errors_single_message() {
        let mut detail = validator::ValidationError::new("email_format");
        detail.message = Some("Invalid email format".into());
        let mut errors = validator::ValidationErrors::new();
        errors.add("email", detail);

        let error: ApiError = errors.into();
        match error {
            ApiError::Validation(msg) => assert_eq!(msg, "Invalid email format"),
            _ => panic!("Expected Validation error"),
        }
    }
}
