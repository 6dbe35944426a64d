//! The two-phase CAS handshake: challenge (outbound redirect) and callback
//! (inbound ticket exchange).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::CasConfig;
use crate::error::{CasError, CasResult};
use crate::events::CasEvents;
use crate::identity::{build_identity, IdentityRecord};
use crate::session::AuthenticationSession;
use crate::state::{correlation_matches, generate_correlation_token, JwtStateCodec, StateCodec};
use crate::transport::{Backchannel, ReqwestBackchannel};
use crate::validation::validator_for;

/// The parts of the inbound HTTP request the handshake needs to compute
/// URLs. Built by the hosting layer.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Scheme of the inbound request (`http` or `https`).
    pub scheme: String,
    /// Host (and optional port) of the inbound request.
    pub host: String,
    /// Full URL of the inbound request; becomes the post-login redirect
    /// target when the caller does not request one.
    pub uri: String,
}

/// Result of the challenge phase.
#[derive(Debug, Clone)]
pub struct Challenge {
    /// CAS login URL to redirect the caller to.
    pub authorization_url: String,
    /// Anti-forgery token for this attempt. The host stores it client-side
    /// (typically a cookie) and presents it back on callback.
    pub correlation_token: String,
}

/// Result of a successful callback phase.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The verified identity, ready for host session issuance.
    pub identity: IdentityRecord,
    /// Where the challenge phase wanted the caller sent after login.
    pub redirect_target: String,
}

/// Drives one-shot CAS authentication attempts.
///
/// Holds only read-only configuration and injectable collaborators, so a
/// single instance serves concurrent attempts without locking. Each attempt
/// either terminates authenticated or rejected; the handshake never retries.
pub struct CasHandshake {
    config: CasConfig,
    state_codec: Arc<dyn StateCodec>,
    backchannel: Arc<dyn Backchannel>,
    events: CasEvents,
}

impl CasHandshake {
    /// Create a handshake with the default collaborators: a
    /// [`JwtStateCodec`] signing with `state_secret` and a
    /// [`ReqwestBackchannel`].
    #[must_use]
    pub fn new(config: CasConfig, state_secret: &str) -> Self {
        Self {
            config,
            state_codec: Arc::new(JwtStateCodec::new(state_secret)),
            backchannel: Arc::new(ReqwestBackchannel::new()),
            events: CasEvents::default(),
        }
    }

    /// Create a handshake with explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: CasConfig,
        state_codec: Arc<dyn StateCodec>,
        backchannel: Arc<dyn Backchannel>,
        events: CasEvents,
    ) -> Self {
        Self {
            config,
            state_codec,
            backchannel,
            events,
        }
    }

    /// The handshake configuration.
    #[must_use]
    pub fn config(&self) -> &CasConfig {
        &self.config
    }

    /// Build the URL the CAS server redirects back to, fully percent-encoded
    /// for embedding as a query value in the login URL.
    ///
    /// The callback phase recomputes this from the received state parameter;
    /// the CAS protocol requires the validation-time `service` string to
    /// match the challenge-time one byte for byte.
    fn build_return_to_url(&self, request: &RequestContext, state: &str) -> String {
        let scheme = if self.config.service_force_https {
            "https"
        } else {
            request.scheme.as_str()
        };

        let host = match &self.config.service_host {
            Some(service_host) if !service_host.trim().is_empty() => {
                service_host.replace('/', "")
            }
            _ => request.host.clone(),
        };

        let return_to = format!(
            "{scheme}://{host}{}?state={}",
            self.config.callback_path,
            urlencoding::encode(state)
        );

        urlencoding::encode(&return_to).into_owned()
    }

    /// Challenge phase: create the per-attempt session and compute the CAS
    /// login URL to redirect the caller to.
    ///
    /// When `redirect_target` is empty or absent, the current request URL is
    /// used. The returned correlation token must be stored client-side and
    /// presented to [`CasHandshake::complete_callback`].
    pub fn begin_challenge(
        &self,
        request: &RequestContext,
        redirect_target: Option<String>,
    ) -> CasResult<Challenge> {
        let redirect_target = redirect_target
            .filter(|target| !target.is_empty())
            .unwrap_or_else(|| request.uri.clone());

        let correlation_token = generate_correlation_token();
        let session = AuthenticationSession::new(redirect_target, correlation_token.clone());

        let state = self.state_codec.protect(&session)?;
        let service = self.build_return_to_url(request, &state);

        let mut authorization_url = format!(
            "{}/login?service={service}",
            self.config.cas_server_url_base
        );
        if self.config.renew {
            authorization_url.push_str("&renew=true");
        }
        if self.config.gateway {
            authorization_url.push_str("&gateway=true");
        }

        info!(
            cas_server = %self.config.cas_server_url_base,
            protocol = %self.config.protocol_version,
            "Issuing CAS authentication challenge"
        );

        Ok(Challenge {
            authorization_url,
            correlation_token,
        })
    }

    /// Callback phase: verify state and correlation, then exchange the
    /// service ticket for an identity.
    ///
    /// `expected_correlation` is the token the host stored client-side at
    /// challenge time. Every rejection is a typed [`CasError`]; nothing here
    /// panics on hostile input.
    pub async fn complete_callback(
        &self,
        request: &RequestContext,
        query: &HashMap<String, String>,
        expected_correlation: Option<&str>,
    ) -> CasResult<Authenticated> {
        let state = query
            .get("state")
            .filter(|state| !state.is_empty())
            .ok_or(CasError::MissingOrInvalidState)?;

        let session = self.state_codec.unprotect(state).map_err(|_| {
            warn!("CAS callback carried a state parameter that failed to unprotect");
            CasError::MissingOrInvalidState
        })?;

        // Anti-CSRF correlation check per RFC 6749 §10.12: the token bound
        // into the state must match the one held by this client.
        let correlated = expected_correlation
            .is_some_and(|expected| correlation_matches(&session.correlation_token, expected));
        if !correlated {
            warn!("CAS callback correlation token absent or mismatched");
            return Err(CasError::CorrelationMismatch);
        }

        let ticket = query
            .get("ticket")
            .filter(|ticket| !ticket.is_empty())
            .ok_or(CasError::MissingServiceTicket)?;

        // Recompute the exact service string presented at challenge time.
        let service = self.build_return_to_url(request, state);

        let validator = validator_for(self.config.protocol_version);
        let validated = validator
            .validate(ticket, &service, &self.config, self.backchannel.as_ref())
            .await?;

        let Some(result) = validated else {
            warn!(
                protocol = %self.config.protocol_version,
                "CAS server rejected the service ticket"
            );
            return Err(CasError::TicketValidationFailed);
        };

        let mut identity = build_identity(
            &result.username,
            &result.attributes,
            &self.config,
            self.config.claims_issuer(),
        );
        self.events.creating_identity(&mut identity);

        info!(username = %identity.username, "CAS ticket validated");

        Ok(Authenticated {
            identity,
            redirect_target: session.redirect_target,
        })
    }
}
