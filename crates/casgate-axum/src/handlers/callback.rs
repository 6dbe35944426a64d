//! Callback handler: exchange the service ticket for a host session.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use axum::response::Response;
use tracing::info;

use crate::correlation::{clear_correlation_cookie, extract_correlation_cookie};
use crate::error::CasApiError;
use crate::extractors::ClientRequest;
use crate::router::CasAuthState;

/// Complete the CAS callback: verify state and correlation, validate the
/// ticket, then hand the identity to the host's session issuer. The
/// correlation cookie is cleared either way.
pub async fn callback(
    State(state): State<CasAuthState>,
    ClientRequest(request): ClientRequest,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, CasApiError> {
    let expected_correlation = extract_correlation_cookie(&headers);

    let outcome = state
        .handshake
        .complete_callback(&request, &query, expected_correlation.as_deref())
        .await?;

    info!(username = %outcome.identity.username, "CAS callback authenticated");

    let mut response = state
        .session_issuer
        .establish(outcome.identity, outcome.redirect_target)
        .await;

    let cookie = clear_correlation_cookie(state.secure_cookies);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }

    Ok(response)
}
