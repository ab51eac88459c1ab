use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::{payments::PaymentError, storage::StorageError},
    state::SessionError,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A required collaborator is not configured on this deployment.
    #[error("not configured: {0}")]
    NotConfigured(String),
    /// An upstream provider refused the request.
    #[error("rejected upstream: {0}")]
    Rejected(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidConfiguration(message) => ServiceError::InvalidInput(message),
            SessionError::SessionNotFound(id) => {
                ServiceError::NotFound(format!("session `{id}` not found"))
            }
            SessionError::InvalidTransition(invalid) => {
                ServiceError::InvalidState(invalid.to_string())
            }
        }
    }
}

impl From<PaymentError> for ServiceError {
    fn from(err: PaymentError) -> Self {
        ServiceError::Rejected(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(err.body_text());
        }
        AppError::BadRequest(format!("malformed multipart body: {}", err.body_text()))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Request body exceeds the configured upload limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message without the category prefix, as sent to clients.
    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::PayloadTooLarge(message)
            | AppError::Conflict(message)
            | AppError::ServiceUnavailable(message)
            | AppError::Internal(message) => message,
        }
    }

    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::NotConfigured(message) => AppError::Internal(message),
            ServiceError::Rejected(message) => AppError::BadRequest(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let payload = Json(ErrorBody {
            error: self.message(),
        });

        (self.status(), payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::state::state_machine::{InvalidTransition, SessionStatus};

    #[test]
    fn session_errors_map_to_http_statuses() {
        let not_found: AppError =
            ServiceError::from(SessionError::SessionNotFound(Uuid::nil())).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid: AppError =
            ServiceError::from(SessionError::InvalidConfiguration("empty".into())).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), "empty");

        let backwards: AppError = ServiceError::from(SessionError::InvalidTransition(
            InvalidTransition {
                from: SessionStatus::Completed,
                to: SessionStatus::InProgress,
            },
        ))
        .into();
        assert_eq!(backwards.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn missing_collaborator_is_a_server_error() {
        let err: AppError = ServiceError::NotConfigured("Missing STRIPE_SECRET_KEY".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Missing STRIPE_SECRET_KEY");
    }
}
