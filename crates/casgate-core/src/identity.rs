//! Building the normalized identity record from a validated CAS response.

use serde::{Deserialize, Serialize};

use crate::config::CasConfig;

/// Claim type for the authenticated username.
pub const CLAIM_NAME: &str = "name";

/// Claim type for the name identifier.
pub const CLAIM_NAME_IDENTIFIER: &str = "name-identifier";

/// A single name/value fact about the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type (the CAS attribute's local name, or one of the built-in
    /// claim types).
    pub name: String,
    /// Claim value.
    pub value: String,
    /// The party that attributed this claim, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl Claim {
    fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            issuer: None,
        }
    }

    fn issued(name: impl Into<String>, value: impl Into<String>, issuer: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            issuer: Some(issuer.to_string()),
        }
    }
}

/// The terminal artifact of a successful handshake, handed to the host for
/// session issuance. The core never mutates it afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Username confirmed by the CAS server.
    pub username: String,
    /// Name identifier: the username, unless overridden by the configured
    /// name-identifier attribute.
    pub name_identifier: String,
    /// Ordered claims, duplicates preserved.
    pub claims: Vec<Claim>,
}

impl IdentityRecord {
    /// First claim value with the given type, if any.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }
}

/// Map a validated username and raw attribute set into an [`IdentityRecord`].
///
/// Deterministic and side-effect free. Attribute order is preserved and
/// duplicate attribute names are all kept. When
/// `config.name_identifier_attribute` names one of the attributes, its value
/// replaces the username as the name identifier; with duplicates, the last
/// match wins.
#[must_use]
pub fn build_identity(
    username: &str,
    attributes: &[(String, String)],
    config: &CasConfig,
    issuer: &str,
) -> IdentityRecord {
    let mut claims = Vec::with_capacity(attributes.len() + 2);
    claims.push(Claim::issued(CLAIM_NAME, username, issuer));

    let mut name_identifier = username.to_string();

    for (name, value) in attributes {
        if let Some(override_attribute) = &config.name_identifier_attribute {
            if name == override_attribute {
                name_identifier = value.clone();
            }
        }
        claims.push(Claim::attribute(name, value));
    }

    claims.push(Claim::issued(CLAIM_NAME_IDENTIFIER, &name_identifier, issuer));

    IdentityRecord {
        username: username.to_string(),
        name_identifier,
        claims,
    }
}
