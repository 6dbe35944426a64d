//! State protection: serializing the authentication session into an opaque
//! token safe for URL transport.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CasError, CasResult};
use crate::session::AuthenticationSession;

/// State lifetime in minutes. An attempt older than this is rejected on
/// callback.
const STATE_LIFETIME_MINUTES: i64 = 10;

/// Correlation token length in bytes (before base64 encoding).
const CORRELATION_TOKEN_LENGTH: usize = 32;

/// Codec that protects the authentication session for round-tripping through
/// the CAS server.
///
/// The token must be authenticated (tamper-evident); the handshake treats
/// any `unprotect` failure as an invalid state parameter.
pub trait StateCodec: Send + Sync {
    /// Serialize and protect a session into a URL-safe token.
    fn protect(&self, session: &AuthenticationSession) -> CasResult<String>;

    /// Recover the session from a token produced by [`StateCodec::protect`].
    fn unprotect(&self, token: &str) -> CasResult<AuthenticationSession>;
}

/// Generate a fresh correlation token: 32 cryptographically random bytes,
/// URL-safe base64 encoded.
#[must_use]
pub fn generate_correlation_token() -> String {
    let mut bytes = [0u8; CORRELATION_TOKEN_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two correlation tokens in constant time.
#[must_use]
pub fn correlation_matches(expected: &str, presented: &str) -> bool {
    if expected.len() != presented.len() {
        return false;
    }

    let mut result = 0u8;
    for (a, b) in expected.bytes().zip(presented.bytes()) {
        result |= a ^ b;
    }
    result == 0
}

/// Session claims stored in the signed state JWT.
#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    /// Random nonce for uniqueness.
    nonce: String,
    /// The protected session.
    #[serde(flatten)]
    session: AuthenticationSession,
    /// Expiration timestamp.
    exp: i64,
    /// Issued at timestamp.
    iat: i64,
}

/// Default [`StateCodec`]: an HMAC-signed JWT with a short expiry.
///
/// The token is signed, not encrypted; the session contents are opaque to
/// the CAS server only by convention. Hosts needing confidentiality supply
/// their own codec.
#[derive(Clone)]
pub struct JwtStateCodec {
    secret: Vec<u8>,
}

impl JwtStateCodec {
    /// Create a codec signing with the given secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }
}

impl StateCodec for JwtStateCodec {
    fn protect(&self, session: &AuthenticationSession) -> CasResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(STATE_LIFETIME_MINUTES);

        let claims = StateClaims {
            nonce: Uuid::new_v4().to_string(),
            session: session.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| CasError::StateProtection {
            reason: e.to_string(),
        })
    }

    fn unprotect(&self, token: &str) -> CasResult<AuthenticationSession> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        let token_data = decode::<StateClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|_| CasError::MissingOrInvalidState)?;

        Ok(token_data.claims.session)
    }
}
