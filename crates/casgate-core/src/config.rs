//! Handshake configuration.

use serde::{Deserialize, Serialize};

/// Display name and scheme identifier of the authentication method.
pub const CAS_SCHEME: &str = "CAS";

/// Default path the CAS server redirects back to after login.
pub const DEFAULT_CALLBACK_PATH: &str = "/signin-cas";

/// XML namespace a CAS service response is expected to conform to.
pub const CAS_XML_NAMESPACE: &str = "http://www.yale.edu/tp/cas";

/// Default name of the response element that wraps CAS user attributes
/// (`cas:attributes`).
pub const DEFAULT_ATTRIBUTES_PARENT_NODE_NAME: &str = "attributes";

/// CAS protocol version, selecting the ticket validator and its default
/// validation endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasProtocolVersion {
    /// CAS 1.0: plain-text responses from `/validate`.
    V1,
    /// CAS 2.0: XML responses from `/serviceValidate`.
    V2,
    /// CAS 3.0: XML responses from `/p3/serviceValidate`.
    V3,
}

impl std::fmt::Display for CasProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CasProtocolVersion::V1 => write!(f, "1.0"),
            CasProtocolVersion::V2 => write!(f, "2.0"),
            CasProtocolVersion::V3 => write!(f, "3.0"),
        }
    }
}

/// Configuration for the CAS handshake.
///
/// Supplied once at setup and read-only for the lifetime of the handshake;
/// concurrent authentication attempts share it without locking.
#[derive(Debug, Clone)]
pub struct CasConfig {
    /// Base URL of the CAS server, without a trailing slash
    /// (e.g. `https://cas.example.edu/cas`).
    pub cas_server_url_base: String,

    /// Explicit ticket validation URL. When unset, the validator appends its
    /// version-specific default path to `cas_server_url_base`. Useful when
    /// validation is served by a different host than login.
    pub cas_validation_url: Option<String>,

    /// Path the CAS server redirects back to after authentication.
    pub callback_path: String,

    /// Host (and optional port) to present to the CAS server in the
    /// `service` parameter instead of the inbound request's host.
    pub service_host: Option<String>,

    /// Always present the service URL with the `https` scheme, for CAS
    /// servers configured to refuse insecure services.
    pub service_force_https: bool,

    /// Ask the CAS server to always re-prompt for credentials, effectively
    /// disabling single sign-on for this service.
    pub renew: bool,

    /// Ask the CAS server for gateway mode, where authentication is not
    /// required to access the resource.
    pub gateway: bool,

    /// The CAS protocol version to validate tickets with.
    pub protocol_version: CasProtocolVersion,

    /// XML namespace override for parsing validation responses. Defaults to
    /// [`CAS_XML_NAMESPACE`].
    pub service_response_namespace: Option<String>,

    /// Name of the response element wrapping the user attributes.
    pub attributes_parent_node_name: String,

    /// Name of the CAS attribute whose value replaces the username as the
    /// name identifier of the resulting identity.
    pub name_identifier_attribute: Option<String>,

    /// Issuer recorded on the `name` and `name-identifier` claims. Defaults
    /// to [`CAS_SCHEME`].
    pub claims_issuer: Option<String>,
}

impl CasConfig {
    /// Create a configuration for the given CAS server with protocol
    /// defaults: CAS 3.0 validation and the standard callback path.
    #[must_use]
    pub fn new(cas_server_url_base: impl Into<String>) -> Self {
        Self {
            cas_server_url_base: cas_server_url_base.into(),
            cas_validation_url: None,
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            service_host: None,
            service_force_https: false,
            renew: false,
            gateway: false,
            protocol_version: CasProtocolVersion::V3,
            service_response_namespace: None,
            attributes_parent_node_name: DEFAULT_ATTRIBUTES_PARENT_NODE_NAME.to_string(),
            name_identifier_attribute: None,
            claims_issuer: None,
        }
    }

    /// The issuer recorded on identity claims.
    #[must_use]
    pub fn claims_issuer(&self) -> &str {
        self.claims_issuer.as_deref().unwrap_or(CAS_SCHEME)
    }

    /// The XML namespace used when parsing validation responses.
    #[must_use]
    pub fn service_response_namespace(&self) -> &str {
        self.service_response_namespace
            .as_deref()
            .unwrap_or(CAS_XML_NAMESPACE)
    }

    /// The name of the element wrapping user attributes, falling back to the
    /// CAS standard `attributes` when configured empty.
    #[must_use]
    pub fn attributes_parent_node_name(&self) -> &str {
        if self.attributes_parent_node_name.is_empty() {
            DEFAULT_ATTRIBUTES_PARENT_NODE_NAME
        } else {
            &self.attributes_parent_node_name
        }
    }
}
