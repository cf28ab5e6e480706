/// Error types for the Posts service
///
/// This module defines all error types that can occur in the service.
/// Errors are converted to appropriate HTTP responses for API clients.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Result type for Posts service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// A required attribute is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("No resource with this id exists")]
    NotFound,

    /// Missing, invalid, or expired bearer token; also used when an
    /// authenticated subject is not the owner of the target post
    #[error("Missing or invalid token")]
    Unauthorized,

    /// Authenticated but the record is private and owned by someone else
    #[error("This resource is private")]
    Forbidden,

    /// The Accept header rejects application/json
    #[error("Requested media type is not supported")]
    NotAcceptable,

    /// Unsupported method on a collection (bulk delete)
    #[error("This method is not allowed on the collection")]
    MethodNotAllowed,

    /// Datastore or identity-provider failure, surfaced without retry
    #[error("Upstream service error: {0}")]
    Upstream(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

impl From<crate::db::StoreError> for AppError {
    fn from(err: crate::db::StoreError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::NotAcceptable.status_code(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Upstream("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn upstream_errors_keep_their_cause() {
        let err = AppError::from(crate::db::StoreError::Transport("timed out".into()));
        assert!(err.to_string().contains("timed out"));
    }
}
