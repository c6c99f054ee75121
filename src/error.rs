//! Error types for the solver core and the HTTP layer.
//!
//! The core has a single failure mode, [`SolverError::InvalidInput`]. Everything
//! else (sessions, OAuth, configuration) belongs to the dispatch layer and is
//! mapped onto an HTTP status by [`ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Failure raised by a solver or by request validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error("{0}")]
    InvalidInput(String),
}

impl SolverError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SolverError::InvalidInput(message.into())
    }

    /// Shorthand for the "required field is missing" case.
    ///
    /// ```
    /// use combinatorics_solver::error::SolverError;
    ///
    /// let err = SolverError::missing("cities");
    /// assert_eq!(err.to_string(), "Missing required field: cities");
    /// ```
    pub fn missing(field: &str) -> Self {
        SolverError::InvalidInput(format!("Missing required field: {}", field))
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Invalid environment configuration detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Incomplete OAuth configuration: {0} is set but {1} is missing")]
    IncompleteOAuth(&'static str, &'static str),
}

/// Failure while talking to the OAuth provider.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    #[error("Unknown or expired login state")]
    InvalidState,

    #[error("OAuth provider is not configured")]
    NotConfigured,

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    BadGateway(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<SolverError> for ApiError {
    fn from(error: SolverError) -> Self {
        match error {
            SolverError::InvalidInput(message) => ApiError::BadRequest(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidState => ApiError::BadRequest(error.to_string()),
            AuthError::NotConfigured => ApiError::ServiceUnavailable(error.to_string()),
            AuthError::Request(_) | AuthError::Provider { .. } => {
                ApiError::BadGateway(error.to_string())
            }
            AuthError::InvalidUrl(_) => ApiError::Internal(error.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Solver task failed: {}", error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (StatusCode::FORBIDDEN, "Unauthorized access".to_string()),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::ServiceUnavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Internal(message) => {
                tracing::error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response = ApiError::from(SolverError::missing("items")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_is_forbidden() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_errors_map_by_cause() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidState),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::NotConfigured),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Provider {
                status: 401,
                message: "denied".into()
            }),
            ApiError::BadGateway(_)
        ));
    }
}
