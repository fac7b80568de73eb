//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Translate a `DomainError` into a status code and an error envelope.
///
/// A missing customer row means the caller's identity is not recognised
/// and answers 401. Storage failures are logged and answered with a generic message so
/// driver details never reach the client.
pub fn domain_error(err: DomainError) -> ApiError {
    let (status, message) = match err {
        DomainError::NotFound {
            entity: "Customer", ..
        } => (StatusCode::UNAUTHORIZED, "Unknown customer".to_string()),
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        DomainError::Storage(detail) => {
            error!(error = %detail, "Storage failure while handling request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(ApiResponse::error(message)))
}
