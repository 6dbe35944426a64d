//! Per-attempt authentication session state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// State created at challenge time and round-tripped through the CAS server
/// inside the protected `state` parameter.
///
/// The session is serialized once, carried opaquely in the service URL, and
/// consumed exactly once at callback time. It is never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationSession {
    /// Where to send the caller once authentication completes.
    pub redirect_target: String,

    /// Anti-forgery token bound to this attempt. The same value is held
    /// client-side (e.g. in a cookie) and compared on callback.
    pub correlation_token: String,

    /// Additional host-defined properties carried through the handshake.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl AuthenticationSession {
    /// Create a session for one authentication attempt.
    #[must_use]
    pub fn new(redirect_target: impl Into<String>, correlation_token: impl Into<String>) -> Self {
        Self {
            redirect_target: redirect_target.into(),
            correlation_token: correlation_token.into(),
            properties: HashMap::new(),
        }
    }

    /// Attach a host-defined property to the session.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_property() {
        let session = AuthenticationSession::new("/dashboard", "corr-token")
            .with_property("locale", "en-US")
            .with_property("prompt", "login");

        assert_eq!(session.redirect_target, "/dashboard");
        assert_eq!(session.correlation_token, "corr-token");
        assert_eq!(session.properties.get("locale").map(String::as_str), Some("en-US"));
        assert_eq!(session.properties.len(), 2);
    }
}
