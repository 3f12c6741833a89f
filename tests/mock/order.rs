//! Order lifecycle against a wiremock server.

use checkout_connector::{
    Connector, ConnectorError, Digest, Order, ReqwestTransport, Resource, Sha256Digest,
    ORDER_CONTENT_TYPE,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::constants::SECRET;
use crate::common::{object, setup_mock_server};

fn connector() -> Connector<ReqwestTransport> {
    Connector::from_secret(SECRET).expect("Failed to create connector")
}

#[tokio::test]
async fn test_create_then_fetch() {
    let server = setup_mock_server().await;
    let location = format!("{}/checkout/orders/ABC123", server.uri());
    let data = object(json!({
        "purchase_country": "SE",
        "purchase_currency": "SEK",
        "locale": "sv-se"
    }));
    let body = serde_json::to_string(&data).unwrap();
    let authorization = format!("Klarna {}", Sha256Digest.create(&format!("{body}{SECRET}")));

    Mock::given(method("POST"))
        .and(path("/checkout/orders"))
        .and(header("Content-Type", ORDER_CONTENT_TYPE))
        .and(header("Authorization", authorization.as_str()))
        .and(body_json(json!({
            "purchase_country": "SE",
            "purchase_currency": "SEK",
            "locale": "sv-se"
        })))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", location.as_str()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/checkout/orders/ABC123"))
        .and(header("Accept", ORDER_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ABC123",
            "status": "checkout_incomplete",
            "purchase_country": "SE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector();
    let mut order = Order::with_base_uri(&format!("{}/checkout/orders", server.uri()));

    order.create(&connector, data).await.expect("Failed to create order");
    assert_eq!(order.location(), Some(location.as_str()));
    assert_eq!(order.get("status"), None);

    order.fetch(&connector).await.expect("Failed to fetch order");
    assert_eq!(order.get("id"), Some(&json!("ABC123")));
    assert_eq!(order.get("status"), Some(&json!("checkout_incomplete")));
}

#[tokio::test]
async fn test_update_posts_to_location() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/checkout/orders/ABC123"))
        .and(body_json(json!({"status": "created"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ABC123",
            "status": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut order = Order::with_location(&format!("{}/checkout/orders/ABC123", server.uri()));
    order
        .update(&connector(), object(json!({"status": "created"})))
        .await
        .expect("Failed to update order");

    assert_eq!(order.get("status"), Some(&json!("created")));
}

#[tokio::test]
async fn test_fetch_unknown_order() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/checkout/orders/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "http_status_code": 404,
            "http_status_message": "Not Found"
        })))
        .mount(&server)
        .await;

    let mut order = Order::with_location(&format!("{}/checkout/orders/missing", server.uri()));
    let err = order.fetch(&connector()).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(order.get("http_status_code").is_none());
}

#[tokio::test]
async fn test_fetch_without_location() {
    let mut order = Order::with_base_uri("http://127.0.0.1:9/checkout/orders");
    let err = order.fetch(&connector()).await.unwrap_err();

    assert!(matches!(err, ConnectorError::MissingUrl));
}
