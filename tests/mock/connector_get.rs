//! GET requests through the connector.
//!
//! Covers request signing, the `Accept` header, JSON decoding and the URL
//! override option.

use checkout_connector::{ApplyOptions, Connector, ConnectorError, HttpResponse, Method};
use serde_json::json;

use crate::common::constants::{DIGEST, PAYLOAD, SECRET, STUB_CONTENT_TYPE, STUB_LOCATION};
use crate::common::{ok, CountingDigest, MockTransport, ResourceStub};

#[tokio::test]
async fn test_apply_get_200() {
    let transport = MockTransport::with_responses([ok(PAYLOAD)]);
    let digest = CountingDigest::default();
    let connector = Connector::new(&transport, &digest, SECRET);
    let mut resource = ResourceStub::new();

    let result = connector
        .apply(Method::GET, &mut resource, ApplyOptions::default())
        .await
        .expect("apply should succeed");

    assert_eq!(result.status(), 200);
    assert_eq!(result.payload(), PAYLOAD);
    assert_eq!(result.data(), &json!({"flobadob": ["bobcat", "wookie"]}));

    // Signed once, with the secret alone since GET has no body
    assert_eq!(digest.inputs(), vec![SECRET.to_string()]);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.url(), STUB_LOCATION);
    assert_eq!(request.header("Authorization"), Some(format!("Klarna {DIGEST}").as_str()));
    assert_eq!(request.header("accept"), Some(STUB_CONTENT_TYPE));
    assert_eq!(request.body(), None);
    assert!(request.header("Content-Type").is_none());
    assert!(request
        .header("user-agent")
        .unwrap()
        .starts_with("Library/checkout-connector_"));

    assert_eq!(result.request(), &request);
}

#[tokio::test]
async fn test_apply_get_200_hands_data_to_resource() {
    let transport = MockTransport::with_responses([ok(PAYLOAD)]);
    let connector = Connector::new(&transport, CountingDigest::default(), SECRET);
    let mut resource = ResourceStub::new();

    connector
        .apply(Method::GET, &mut resource, ApplyOptions::default())
        .await
        .unwrap();

    let parsed = resource.parsed.expect("resource should be parsed");
    assert_eq!(parsed.get("flobadob"), Some(&json!(["bobcat", "wookie"])));
}

#[tokio::test]
async fn test_apply_get_200_invalid_json() {
    let transport = MockTransport::with_responses([ok(r#"{"flobadob"}"#)]);
    let connector = Connector::new(&transport, CountingDigest::default(), "secret");
    let mut resource = ResourceStub::new();

    let err = connector
        .apply(Method::GET, &mut resource, ApplyOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Format { .. }), "got {err:?}");
    assert_eq!(err.request().map(|r| r.url()), Some(STUB_LOCATION));
    assert!(resource.parsed.is_none());
    // Not retried
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_apply_get_200_empty_body_is_format_error() {
    let transport = MockTransport::with_responses([ok("")]);
    let connector = Connector::new(&transport, CountingDigest::default(), SECRET);

    let err = connector
        .apply(Method::GET, &mut ResourceStub::new(), ApplyOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Format { .. }));
}

#[tokio::test]
async fn test_apply_with_url_in_options() {
    let transport = MockTransport::with_responses([ok(PAYLOAD)]);
    let digest = CountingDigest::default();
    let connector = Connector::new(&transport, &digest, SECRET);

    let result = connector
        .apply(
            Method::GET,
            &mut ResourceStub::new(),
            ApplyOptions::new().url("localhost"),
        )
        .await
        .unwrap();

    assert_eq!(result.request().url(), "localhost");
    assert_eq!(digest.calls(), 1);
}

#[tokio::test]
async fn test_apply_without_url_fails_before_sending() {
    let transport = MockTransport::new();
    let digest = CountingDigest::default();
    let connector = Connector::new(&transport, &digest, SECRET);

    let err = connector
        .apply(
            Method::GET,
            &mut ResourceStub::without_location(),
            ApplyOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::MissingUrl));
    assert!(transport.requests().is_empty());
    assert_eq!(digest.calls(), 0);
}

#[tokio::test]
async fn test_apply_get_204_without_body() {
    let transport = MockTransport::with_responses([HttpResponse::new(204, "")]);
    let connector = Connector::new(&transport, CountingDigest::default(), SECRET);

    let result = connector
        .apply(Method::DELETE, &mut ResourceStub::new(), ApplyOptions::default())
        .await
        .unwrap();

    assert_eq!(result.status(), 204);
    assert!(result.data().is_null());
}

#[tokio::test]
async fn test_apply_get_403_maps_to_status_error() {
    let transport = MockTransport::with_responses([HttpResponse::new(
        403,
        r#"{"http_status_code":403,"internal_message":"Bad shared secret"}"#,
    )]);
    let connector = Connector::new(&transport, CountingDigest::default(), SECRET);

    let err = connector
        .apply(Method::GET, &mut ResourceStub::new(), ApplyOptions::default())
        .await
        .unwrap_err();

    let ConnectorError::Status(status) = &err else {
        panic!("expected a status error, got {err:?}");
    };
    assert_eq!(status.status(), 403);
    assert_eq!(status.reason(), "Forbidden");
    assert_eq!(err.to_string(), "403 Forbidden");
    assert_eq!(
        status.data().and_then(|data| data.get("internal_message")),
        Some(&json!("Bad shared secret"))
    );
}

#[tokio::test]
async fn test_transport_failure_is_not_retried() {
    // No queued response: the mock transport fails
    let transport = MockTransport::new();
    let connector = Connector::new(&transport, CountingDigest::default(), SECRET);

    let err = connector
        .apply(Method::GET, &mut ResourceStub::new(), ApplyOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Transport(_)));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_typed_response_body() {
    #[derive(serde::Deserialize)]
    struct Body {
        flobadob: Vec<String>,
    }

    let transport = MockTransport::with_responses([ok(PAYLOAD)]);
    let connector = Connector::new(&transport, CountingDigest::default(), SECRET);

    let result = connector
        .apply(Method::GET, &mut ResourceStub::new(), ApplyOptions::default())
        .await
        .unwrap();

    let body: Body = result.json().unwrap();
    assert_eq!(body.flobadob, vec!["bobcat", "wookie"]);
}

#[tokio::test]
async fn test_concurrent_applies_share_connector() {
    let transport = MockTransport::with_responses([ok(PAYLOAD), ok(PAYLOAD), ok(PAYLOAD)]);
    let digest = CountingDigest::default();
    let connector = Connector::new(&transport, &digest, SECRET);

    let mut resources = vec![ResourceStub::new(), ResourceStub::new(), ResourceStub::new()];
    let calls = resources
        .iter_mut()
        .map(|resource| connector.apply(Method::GET, resource, ApplyOptions::default()));

    let results = futures::future::join_all(calls).await;
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(digest.calls(), 3);
}
