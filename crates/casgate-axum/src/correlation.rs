//! Correlation cookie helpers.
//!
//! The correlation token generated at challenge time is stored in a cookie
//! on the caller's browser and compared against the token bound into the
//! state parameter on callback.

use axum::http::header::HeaderMap;

/// Cookie name for the handshake correlation token.
pub const CORRELATION_COOKIE_NAME: &str = "casgate_correlation";

/// Cookie max age in seconds; matches the state lifetime.
pub const CORRELATION_COOKIE_MAX_AGE: i64 = 600;

/// Build the correlation cookie header value.
///
/// SameSite must be Lax, not Strict: the callback arrives as a cross-site
/// redirect from the CAS server and a Strict cookie would not accompany it.
#[must_use]
pub fn create_correlation_cookie(token: &str, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{CORRELATION_COOKIE_NAME}={token}; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age={CORRELATION_COOKIE_MAX_AGE}"
    )
}

/// Extract the correlation token from request cookies.
#[must_use]
pub fn extract_correlation_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for part in cookie_str.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(&format!("{CORRELATION_COOKIE_NAME}=")) {
            return Some(value.trim().to_string());
        }
    }

    None
}

/// Build the header value that clears the correlation cookie. The token is
/// single-use; it is cleared as soon as the callback consumes it.
#[must_use]
pub fn clear_correlation_cookie(secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!("{CORRELATION_COOKIE_NAME}=; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age=0")
}
