//! HTTP mapping of handshake errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use casgate_core::CasError;

/// Error response structure for API responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// A [`CasError`] surfaced through an HTTP handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct CasApiError(#[from] pub CasError);

impl CasApiError {
    /// The HTTP status for this rejection.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            CasError::MissingOrInvalidState
            | CasError::CorrelationMismatch
            | CasError::MissingServiceTicket => StatusCode::BAD_REQUEST,
            CasError::TicketValidationFailed => StatusCode::UNAUTHORIZED,
            CasError::ValidationEndpointError { .. } => StatusCode::BAD_GATEWAY,
            CasError::StateProtection { .. } | CasError::Configuration { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CasApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Do not echo upstream or configuration details to the caller.
        let message = match &self.0 {
            CasError::ValidationEndpointError { reason } => {
                tracing::warn!(reason = %reason, "CAS validation endpoint error");
                "The CAS server could not be reached for ticket validation".to_string()
            }
            CasError::StateProtection { reason } => {
                tracing::error!(reason = %reason, "CAS state protection error");
                "An internal error occurred".to_string()
            }
            CasError::Configuration { message } => {
                tracing::error!(message = %message, "CAS configuration error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: self.0.error_code().to_string(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}
