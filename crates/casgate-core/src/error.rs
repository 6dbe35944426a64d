//! CAS authentication error types.

use thiserror::Error;

/// Errors raised during the CAS handshake.
///
/// Every variant maps to a rejected authentication attempt; none of them is
/// fatal to the process. The host decides the user-visible behavior
/// (typically an error page or a fresh challenge).
#[derive(Debug, Error)]
pub enum CasError {
    /// The callback carried no `state` parameter, or the state could not be
    /// unprotected.
    #[error("state data is missing from the request, or it is invalid")]
    MissingOrInvalidState,

    /// The anti-forgery correlation token was absent or did not match the
    /// one bound into the state (RFC 6749 §10.12 style check).
    #[error("correlation of the login attempt and the callback failed")]
    CorrelationMismatch,

    /// The callback carried no `ticket` parameter.
    #[error("service ticket identifier is missing from the request")]
    MissingServiceTicket,

    /// The CAS validation endpoint could not be reached, or it answered with
    /// a non-success HTTP status. Not retried.
    #[error("validation endpoint error: {reason}")]
    ValidationEndpointError { reason: String },

    /// The CAS server was reached but rejected the ticket, or its success
    /// response was unparsable or incomplete.
    #[error("failed to validate the service ticket with the CAS server")]
    TicketValidationFailed,

    /// Protecting the authentication session at challenge time failed.
    #[error("state protection error: {reason}")]
    StateProtection { reason: String },

    /// The handshake configuration is unusable.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CasError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            CasError::MissingOrInvalidState => "invalid_state",
            CasError::CorrelationMismatch => "correlation_mismatch",
            CasError::MissingServiceTicket => "missing_ticket",
            CasError::ValidationEndpointError { .. } => "validation_endpoint_error",
            CasError::TicketValidationFailed => "ticket_validation_failed",
            CasError::StateProtection { .. } => "state_protection_error",
            CasError::Configuration { .. } => "configuration_error",
        }
    }
}

/// Result type alias for CAS operations.
pub type CasResult<T> = Result<T, CasError>;
