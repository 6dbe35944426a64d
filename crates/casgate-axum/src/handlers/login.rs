//! Challenge handler: redirect the caller to the CAS login page.

use axum::extract::{Query, State};
use axum::http::{header::SET_COOKIE, HeaderValue};
use axum::response::Response;
use serde::Deserialize;
use tracing::info;

use crate::correlation::create_correlation_cookie;
use crate::error::CasApiError;
use crate::extractors::ClientRequest;
use crate::router::CasAuthState;

/// Query parameters accepted by the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Where to send the caller after authentication. Defaults to the
    /// current request URL.
    pub redirect_after: Option<String>,
}

/// Begin the CAS challenge: protect the session, set the correlation cookie
/// and redirect to the CAS login endpoint.
pub async fn login(
    State(state): State<CasAuthState>,
    ClientRequest(request): ClientRequest,
    Query(query): Query<LoginQuery>,
) -> Result<Response, CasApiError> {
    let challenge = state
        .handshake
        .begin_challenge(&request, query.redirect_after)?;

    info!(host = %request.host, "Redirecting to CAS login");

    let mut response = (state.challenge_responder)(&challenge.authorization_url);
    let cookie = create_correlation_cookie(&challenge.correlation_token, state.secure_cookies);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(SET_COOKIE, value);
    }

    Ok(response)
}
