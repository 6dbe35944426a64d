//! CAS protocol 3.0 ticket validator.

use super::async_trait;

use super::response::{parse_service_response, RawValidationResult};
use super::{build_validation_url, fetch_validation_response, resolve_validation_endpoint};
use crate::config::CasConfig;
use crate::error::CasResult;
use crate::transport::Backchannel;

/// Validation endpoint path per the CAS 3.0 specification.
const VALIDATION_ENDPOINT_PATH: &str = "/p3/serviceValidate";

/// Validator for version 3.0 of the CAS specification: same XML response
/// shape as CAS 2.0, with attribute release as a first-class feature.
pub struct Cas3TicketValidator;

#[async_trait]
impl super::TicketValidator for Cas3TicketValidator {
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
