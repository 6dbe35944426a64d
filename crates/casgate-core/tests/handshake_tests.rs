//! End-to-end handshake tests against a mocked CAS server.

use std::collections::HashMap;
use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use casgate_core::{
    CasConfig, CasError, CasEvents, CasHandshake, CasProtocolVersion, Claim, JwtStateCodec,
    ReqwestBackchannel, RequestContext,
};

const STATE_SECRET: &str = "integration-test-state-secret";

fn request() -> RequestContext {
    RequestContext {
        scheme: "https".to_string(),
        host: "app.example.com".to_string(),
        uri: "https://app.example.com/protected".to_string(),
    }
}

fn handshake_for(server: &MockServer, version: CasProtocolVersion) -> CasHandshake {
    let mut config = CasConfig::new(server.uri());
    config.protocol_version = version;
    CasHandshake::new(config, STATE_SECRET)
}

/// Recover the raw state parameter from the login URL's double-encoded
/// service value, exactly as the CAS server would echo it back.
fn state_from_login_url(authorization_url: &str) -> String {
    let service_encoded = authorization_url
        .split("service=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap();
    let service = urlencoding::decode(service_encoded).unwrap();
    let state_encoded = service.split("state=").nth(1).unwrap();
    urlencoding::decode(state_encoded).unwrap().into_owned()
}

fn callback_query(state: String, ticket: &str) -> HashMap<String, String> {
    HashMap::from([
        ("state".to_string(), state),
        ("ticket".to_string(), ticket.to_string()),
    ])
}

const V3_SUCCESS_BODY: &str = r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
    <cas:authenticationSuccess>
        <cas:user>alice</cas:user>
        <cas:attributes>
            <cas:email>alice@example.com</cas:email>
            <cas:displayName>Alice Example</cas:displayName>
        </cas:attributes>
    </cas:authenticationSuccess>
</cas:serviceResponse>"#;

const FAILURE_BODY: &str = r#"<cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
    <cas:authenticationFailure code="INVALID_TICKET">ST-1 not recognized</cas:authenticationFailure>
</cas:serviceResponse>"#;

#[tokio::test]
async fn full_handshake_cas3_with_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p3/serviceValidate"))
        .and(query_param("ticket", "ST-1856339-aA5Yuvrxzpv8Tau1cYQ7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(V3_SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let handshake = handshake_for(&server, CasProtocolVersion::V3);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let outcome = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-1856339-aA5Yuvrxzpv8Tau1cYQ7"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.username, "alice");
    assert_eq!(outcome.identity.name_identifier, "alice");
    assert_eq!(outcome.identity.claim("email"), Some("alice@example.com"));
    assert_eq!(outcome.identity.claim("displayName"), Some("Alice Example"));
    assert_eq!(outcome.redirect_target, "https://app.example.com/protected");
}

#[tokio::test]
async fn full_handshake_cas1_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("yes\nbob\n"))
        .expect(1)
        .mount(&server)
        .await;

    let handshake = handshake_for(&server, CasProtocolVersion::V1);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let outcome = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-2"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.username, "bob");
    // CAS 1.0 never yields attribute claims, only the built-in pair.
    assert_eq!(outcome.identity.claims.len(), 2);
}

#[tokio::test]
async fn full_handshake_cas2_uses_service_validate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/serviceValidate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(V3_SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let handshake = handshake_for(&server, CasProtocolVersion::V2);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let outcome = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-3"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.username, "alice");
}

#[tokio::test]
async fn validation_service_string_matches_challenge_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p3/serviceValidate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(V3_SUCCESS_BODY))
        .mount(&server)
        .await;

    let handshake = handshake_for(&server, CasProtocolVersion::V3);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();

    let service_sent = challenge
        .authorization_url
        .split("service=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap()
        .to_string();
    let state = state_from_login_url(&challenge.authorization_url);

    handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-4"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    // The raw query must embed the identical (still encoded) service string
    // the CAS server saw at challenge time.
    let validation_query = requests[0].url.query().unwrap().to_string();
    assert!(validation_query.contains(&format!("service={service_sent}")));
}

#[tokio::test]
async fn rejected_ticket_yields_validation_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p3/serviceValidate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FAILURE_BODY))
        .mount(&server)
        .await;

    let handshake = handshake_for(&server, CasProtocolVersion::V3);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let result = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-5"),
            Some(&challenge.correlation_token),
        )
        .await;

    assert!(matches!(result, Err(CasError::TicketValidationFailed)));
}

#[tokio::test]
async fn endpoint_http_500_yields_endpoint_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p3/serviceValidate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let handshake = handshake_for(&server, CasProtocolVersion::V3);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let result = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-6"),
            Some(&challenge.correlation_token),
        )
        .await;

    assert!(matches!(result, Err(CasError::ValidationEndpointError { .. })));
}

#[tokio::test]
async fn invalid_state_short_circuits_before_validation() {
    let server = MockServer::start().await;
    // No mock mounted: a validation request would 404 and the expect(0)
    // below would catch it.
    let handshake = handshake_for(&server, CasProtocolVersion::V3);

    let result = handshake
        .complete_callback(
            &request(),
            &callback_query("tampered-state".to_string(), "ST-7"),
            Some("whatever"),
        )
        .await;

    assert!(matches!(result, Err(CasError::MissingOrInvalidState)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn correlation_mismatch_short_circuits_before_validation() {
    let server = MockServer::start().await;
    let handshake = handshake_for(&server, CasProtocolVersion::V3);
    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let result = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-8"),
            Some("a-token-from-someone-else"),
        )
        .await;

    assert!(matches!(result, Err(CasError::CorrelationMismatch)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn challenge_url_carries_renew_but_not_gateway() {
    let mut config = CasConfig::new("https://cas.example.edu/cas");
    config.renew = true;
    let handshake = CasHandshake::new(config, STATE_SECRET);

    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    assert!(challenge
        .authorization_url
        .starts_with("https://cas.example.edu/cas/login?service="));
    assert!(challenge.authorization_url.contains("renew=true"));
    assert!(!challenge.authorization_url.contains("gateway"));
}

#[tokio::test]
async fn creating_identity_hook_enriches_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p3/serviceValidate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(V3_SUCCESS_BODY))
        .mount(&server)
        .await;

    let mut config = CasConfig::new(server.uri());
    config.protocol_version = CasProtocolVersion::V3;
    let events = CasEvents {
        on_creating_identity: Some(Arc::new(|identity| {
            identity.claims.push(Claim {
                name: "tenant".to_string(),
                value: "acme".to_string(),
                issuer: None,
            });
        })),
    };
    let handshake = CasHandshake::with_collaborators(
        config,
        Arc::new(JwtStateCodec::new(STATE_SECRET)),
        Arc::new(ReqwestBackchannel::new()),
        events,
    );

    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let outcome = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-9"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.claim("tenant"), Some("acme"));
}

#[tokio::test]
async fn name_identifier_attribute_override_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/p3/serviceValidate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(V3_SUCCESS_BODY))
        .mount(&server)
        .await;

    let mut config = CasConfig::new(server.uri());
    config.protocol_version = CasProtocolVersion::V3;
    config.name_identifier_attribute = Some("email".to_string());
    let handshake = CasHandshake::new(config, STATE_SECRET);

    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let outcome = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-10"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.name_identifier, "alice@example.com");
    assert_eq!(outcome.identity.username, "alice");
}

#[tokio::test]
async fn explicit_validation_url_overrides_default_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/custom/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string(V3_SUCCESS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = CasConfig::new("https://cas.unreachable.example.edu/cas");
    config.protocol_version = CasProtocolVersion::V3;
    config.cas_validation_url = Some(format!("{}/custom/check", server.uri()));
    let handshake = CasHandshake::new(config, STATE_SECRET);

    let challenge = handshake.begin_challenge(&request(), None).unwrap();
    let state = state_from_login_url(&challenge.authorization_url);

    let outcome = handshake
        .complete_callback(
            &request(),
            &callback_query(state, "ST-11"),
            Some(&challenge.correlation_token),
        )
        .await
        .unwrap();

    assert_eq!(outcome.identity.username, "alice");
}
