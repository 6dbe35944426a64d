//! Router configuration for the CAS authentication endpoints.

use std::sync::Arc;

use axum::http::{header::LOCATION, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use casgate_core::{CasHandshake, IdentityRecord};

use crate::handlers;

/// Interface the host implements to turn a verified identity into its own
/// session (cookie, JWT, whatever the application uses).
///
/// Session issuance is deliberately outside this crate: the handshake ends
/// when the identity record is produced.
#[async_trait::async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Establish the host session and produce the response for the caller,
    /// typically a redirect to `redirect_target`.
    async fn establish(&self, identity: IdentityRecord, redirect_target: String) -> Response;
}

/// Builds the response that delivers the challenge to the caller, given the
/// CAS authorization URL.
pub type ChallengeResponder = Arc<dyn Fn(&str) -> Response + Send + Sync>;

/// Shared state for the CAS handlers.
#[derive(Clone)]
pub struct CasAuthState {
    /// The handshake driver.
    pub handshake: Arc<CasHandshake>,
    /// Host session issuance, invoked after a successful callback.
    pub session_issuer: Arc<dyn SessionIssuer>,
    /// Whether correlation cookies carry the Secure flag.
    pub secure_cookies: bool,
    /// How the login handler delivers the challenge. Defaults to a
    /// 302 redirect to the authorization URL.
    pub challenge_responder: ChallengeResponder,
}

impl CasAuthState {
    /// Create handler state from a handshake and the host's session issuer.
    #[must_use]
    pub fn new(
        handshake: CasHandshake,
        session_issuer: Arc<dyn SessionIssuer>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            handshake: Arc::new(handshake),
            session_issuer,
            secure_cookies,
            challenge_responder: Arc::new(found_redirect),
        }
    }

    /// Replace the default challenge redirect, for hosts that want an
    /// interstitial page or extra headers on the challenge response.
    #[must_use]
    pub fn with_challenge_responder(
        mut self,
        responder: impl Fn(&str) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.challenge_responder = Arc::new(responder);
        self
    }
}

fn found_redirect(authorization_url: &str) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    if let Ok(value) = HeaderValue::from_str(authorization_url) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

/// Create the CAS authentication router.
///
/// Routes `GET /login` (challenge) and `GET /callback` (ticket exchange).
/// Mount it so that the callback route's full path equals
/// `CasConfig::callback_path`; the CAS server validates tickets against a
/// service URL built from that path.
pub fn cas_router() -> Router<CasAuthState> {
    Router::new()
        .route("/login", get(handlers::login))
        .route("/callback", get(handlers::callback))
}
