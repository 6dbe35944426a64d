//! Parsers for the CAS validation endpoint response formats.
//!
//! CAS 1.0 answers in plain text; CAS 2.0 and 3.0 answer with the same
//! namespaced XML document and differ only in their default endpoint path.
//! Both parsers are pure: a body either yields a username (and possibly
//! attributes) or is invalid, never an error.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// Outcome of parsing a successful validation response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValidationResult {
    /// Username confirmed by the CAS server.
    pub username: String,
    /// Attributes in document order, duplicates preserved.
    pub attributes: Vec<(String, String)>,
}

/// Parse a CAS 1.0 plain-text response.
///
/// A valid success body has at least two newline-separated lines, the first
/// case-insensitively equal to `yes` and the second carrying the username.
/// Any other shape, including the `no` rejection body, is invalid. This
/// format never produces attributes.
#[must_use]
pub fn parse_cas1_response(body: &str) -> Option<RawValidationResult> {
    let parts: Vec<&str> = body.split('\n').collect();
    if parts.len() < 2 || !parts[0].eq_ignore_ascii_case("yes") {
        return None;
    }

    let username = parts[1];
    if username.is_empty() {
        return None;
    }

    Some(RawValidationResult {
        username: username.to_string(),
        attributes: Vec::new(),
    })
}

fn ns_matches(resolve: &ResolveResult<'_>, expected: &str) -> bool {
    matches!(resolve, ResolveResult::Bound(Namespace(ns)) if *ns == expected.as_bytes())
}

/// Parse a CAS 2.0/3.0 XML service response.
///
/// Locates `serviceResponse → authenticationSuccess → user` within the
/// given namespace; the user element's text is the username. When an
/// `authenticationSuccess` child named `attributes_parent` exists, each of
/// its child elements becomes one `(local name, text)` attribute pair in
/// document order. A missing user, an `authenticationFailure` response, or
/// malformed XML all yield `None`.
#[must_use]
pub fn parse_service_response(
    body: &str,
    namespace: &str,
    attributes_parent: &str,
) -> Option<RawValidationResult> {
    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut in_service_response = false;
    let mut in_success = false;
    let mut in_user = false;
    let mut in_attributes = false;
    // Set while inside one attribute element; tracks nested markup so the
    // closing tag of the attribute itself is recognized.
    let mut current_attribute: Option<(String, String)> = None;
    let mut attribute_depth = 0usize;

    let mut username: Option<String> = None;
    let mut attributes: Vec<(String, String)> = Vec::new();

    loop {
        match reader.read_resolved_event() {
            Ok((resolve, Event::Start(e))) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");

                if in_attributes {
                    if current_attribute.is_none() {
                        current_attribute = Some((name.to_string(), String::new()));
                    } else {
                        attribute_depth += 1;
                    }
                } else if in_success && name == attributes_parent && ns_matches(&resolve, namespace)
                {
                    in_attributes = true;
                } else if in_success && name == "user" && ns_matches(&resolve, namespace) {
                    in_user = true;
                } else if in_service_response
                    && name == "authenticationSuccess"
                    && ns_matches(&resolve, namespace)
                {
                    in_success = true;
                } else if name == "serviceResponse" && ns_matches(&resolve, namespace) {
                    in_service_response = true;
                }
            }
            Ok((_, Event::Empty(e))) => {
                if in_attributes && current_attribute.is_none() {
                    let local = e.local_name();
                    let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                    attributes.push((name.to_string(), String::new()));
                }
            }
            Ok((_, Event::Text(e))) => {
                let text = e.unescape().unwrap_or_default();
                if in_user {
                    username = Some(text.to_string());
                } else if let Some((_, value)) = current_attribute.as_mut() {
                    value.push_str(&text);
                }
            }
            Ok((_, Event::CData(e))) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                if in_user {
                    username = Some(text);
                } else if let Some((_, value)) = current_attribute.as_mut() {
                    value.push_str(&text);
                }
            }
            Ok((_, Event::End(e))) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");

                if current_attribute.is_some() {
                    if attribute_depth > 0 {
                        attribute_depth -= 1;
                    } else if let Some(pair) = current_attribute.take() {
                        attributes.push(pair);
                    }
                } else if in_attributes && name == attributes_parent {
                    in_attributes = false;
                } else if in_user && name == "user" {
                    in_user = false;
                } else if in_success && name == "authenticationSuccess" {
                    in_success = false;
                } else if name == "serviceResponse" {
                    in_service_response = false;
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(_) => return None,
            _ => {}
        }
    }

    let username = username?;
    if username.is_empty() {
        return None;
    }

    Some(RawValidationResult {
        username,
        attributes,
    })
}
