//! Axum extractors for the CAS handlers.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};

use casgate_core::RequestContext;

/// The inbound request details the handshake needs for URL construction.
///
/// Scheme honors `x-forwarded-proto` when a proxy terminates TLS; host comes
/// from the `Host` header.
#[derive(Debug, Clone)]
pub struct ClientRequest(pub RequestContext);

#[async_trait]
impl<S> FromRequestParts<S> for ClientRequest
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Chained proxies append to x-forwarded-proto; the first entry is
        // the client-facing scheme.
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| parts.uri.scheme_str())
            .unwrap_or("http")
            .to_string();

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .or_else(|| parts.uri.host().map(ToString::to_string))
            .ok_or((StatusCode::BAD_REQUEST, "missing Host header"))?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path(), |pq| pq.as_str());

        let uri = format!("{scheme}://{host}{path_and_query}");

        Ok(ClientRequest(RequestContext { scheme, host, uri }))
    }
}
