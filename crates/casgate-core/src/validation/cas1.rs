//! CAS protocol 1.0 ticket validator.

use super::async_trait;

use super::response::{parse_cas1_response, RawValidationResult};
use super::{build_validation_url, fetch_validation_response, resolve_validation_endpoint};
use crate::config::CasConfig;
use crate::error::CasResult;
use crate::transport::Backchannel;

/// Validation endpoint path per the CAS 1.0 specification.
const VALIDATION_ENDPOINT_PATH: &str = "/validate";

/// Validator for version 1.0 of the CAS specification: plain-text responses,
/// no attribute support.
pub struct Cas1TicketValidator;

#[async_trait]
impl super::TicketValidator for Cas1TicketValidator {
    async fn validate(
        &self,
        ticket: &str,
        service: &str,
        config: &CasConfig,
        backchannel: &dyn Backchannel,
    ) -> CasResult<Option<RawValidationResult>> {
        let endpoint = resolve_validation_endpoint(config, VALIDATION_ENDPOINT_PATH);
        let url = build_validation_url(&endpoint, service, ticket);

        let body = fetch_validation_response(backchannel, &url).await?;

        Ok(parse_cas1_response(&body))
    }
}
