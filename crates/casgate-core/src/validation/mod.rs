//! Ticket validation engine: one validator per CAS protocol version.

pub mod cas1;
pub mod cas2;
pub mod cas3;
pub mod response;

pub use async_trait::async_trait;
use tracing::warn;

pub use cas1::Cas1TicketValidator;
pub use cas2::Cas2TicketValidator;
pub use cas3::Cas3TicketValidator;
pub use response::RawValidationResult;

use crate::config::{CasConfig, CasProtocolVersion};
use crate::error::{CasError, CasResult};
use crate::transport::Backchannel;

/// Contract every protocol-version validator implements.
///
/// `service` is the exact (already percent-encoded) service string presented
/// to the CAS server at challenge time; the CAS protocol requires validating
/// the ticket against the identical value.
#[async_trait]
pub trait TicketValidator: Send + Sync {
    /// Validate a service ticket against the CAS server.
    ///
    /// Returns `Ok(None)` when the CAS server rejected the ticket or its
    /// success response was incomplete; this is the normal negative outcome,
    /// not an error.
    async fn validate(
        &self,
        ticket: &str,
        service: &str,
        config: &CasConfig,
        backchannel: &dyn Backchannel,
    ) -> CasResult<Option<RawValidationResult>>;
}

/// The validator for the configured protocol version.
#[must_use]
pub fn validator_for(version: CasProtocolVersion) -> &'static dyn TicketValidator {
    match version {
        CasProtocolVersion::V1 => &Cas1TicketValidator,
        CasProtocolVersion::V2 => &Cas2TicketValidator,
        CasProtocolVersion::V3 => &Cas3TicketValidator,
    }
}

/// The validation endpoint for this configuration: the explicit override
/// when set, otherwise the server base plus the version-specific default
/// path.
pub(crate) fn resolve_validation_endpoint(config: &CasConfig, default_path: &str) -> String {
    match &config.cas_validation_url {
        Some(url) if !url.is_empty() => url.clone(),
        _ => format!("{}{}", config.cas_server_url_base, default_path),
    }
}

/// Build the full validation URL. The service string is embedded as-is (it
/// is already encoded); only the ticket needs escaping here.
pub(crate) fn build_validation_url(endpoint: &str, service: &str, ticket: &str) -> String {
    format!(
        "{endpoint}?service={service}&ticket={}",
        urlencoding::encode(ticket)
    )
}

/// Call the validation endpoint and return the response body, failing hard
/// (without retry) on transport errors and non-success statuses.
pub(crate) async fn fetch_validation_response(
    backchannel: &dyn Backchannel,
    url: &str,
) -> CasResult<String> {
    let response = backchannel.get(url).await?;

    if !response.is_success() {
        warn!(status = response.status, "CAS validation endpoint returned a non-success status");
        return Err(CasError::ValidationEndpointError {
            reason: format!("validation endpoint returned HTTP {}", response.status),
        });
    }

    Ok(response.body)
}
