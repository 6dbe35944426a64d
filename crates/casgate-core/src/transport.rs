//! Back-channel HTTP transport to the CAS validation endpoint.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CasError, CasResult};

/// User agent presented on back-channel requests.
const BACKCHANNEL_USER_AGENT: &str = "casgate CAS handler";

/// Back-channel request timeout.
const BACKCHANNEL_TIMEOUT_SECS: u64 = 60;

/// Response from the validation endpoint.
#[derive(Debug, Clone)]
pub struct BackchannelResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response body as text.
    pub body: String,
}

impl BackchannelResponse {
    /// Whether the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Injectable HTTP client used for the server-to-server ticket validation
/// call.
///
/// One non-retried GET per callback; cancellation surfaces as a transport
/// error from the implementation.
#[async_trait]
pub trait Backchannel: Send + Sync {
    /// Perform a GET request and return the status and body.
    async fn get(&self, url: &str) -> CasResult<BackchannelResponse>;
}

/// Default [`Backchannel`] built on [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestBackchannel {
    client: reqwest::Client,
}

impl ReqwestBackchannel {
    /// Create a back-channel with the default client configuration.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(BACKCHANNEL_USER_AGENT)
            .timeout(Duration::from_secs(BACKCHANNEL_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Create a back-channel from an existing client, preserving the host's
    /// connection pool and TLS configuration.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestBackchannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backchannel for ReqwestBackchannel {
    async fn get(&self, url: &str) -> CasResult<BackchannelResponse> {
        let response = self.client.get(url).send().await.map_err(|e| {
            CasError::ValidationEndpointError {
                reason: e.to_string(),
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CasError::ValidationEndpointError {
                reason: e.to_string(),
            })?;

        Ok(BackchannelResponse { status, body })
    }
}
