//! CAS protocol 2.0 ticket validator.

use super::async_trait;

use super::response::{parse_service_response, RawValidationResult};
use super::{build_validation_url, fetch_validation_response, resolve_validation_endpoint};
use crate::config::CasConfig;
use crate::error::CasResult;
use crate::transport::Backchannel;

/// Validation endpoint path per the CAS 2.0 specification.
const VALIDATION_ENDPOINT_PATH: &str = "/serviceValidate";

/// Validator for version 2.0 of the CAS specification.
///
/// Attributes inside `/serviceValidate` responses are not an official part
/// of CAS 2.0, but many servers began providing them while CAS 3.0 was being
/// formalized since unaware clients simply ignore them. They are parsed here
/// when present.
pub struct Cas2TicketValidator;

#[async_trait]
impl super::TicketValidator for Cas2TicketValidator {
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

        Ok(parse_service_response(
            &body,
            config.service_response_namespace(),
            config.attributes_parent_node_name(),
        ))
    }
}
