//! HTTP transport tests against a mock server

use billing_store::config::ServerUrls;
use billing_store::model::CreateSubscriptionParams;
use billing_store::{HttpPaymentsApi, PaymentsApi};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpPaymentsApi {
    let servers = ServerUrls {
        auth_url: server.uri(),
        oauth_url: server.uri(),
        profile_url: server.uri(),
    };
    HttpPaymentsApi::new(servers, "access-123")
}

#[tokio::test]
async fn test_fetch_plans_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/oauth/subscriptions/plans"))
        .and(header("authorization", "Bearer access-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "plan_id": "p1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).fetch_plans().await;

    assert_eq!(outcome, Ok(json!([{ "plan_id": "p1" }])));
}

#[tokio::test]
async fn test_fetch_profile_uses_profile_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uid": "u1", "email": "u1@example.com" })))
        .mount(&server)
        .await;

    let outcome = client_for(&server).fetch_profile().await;

    assert_eq!(outcome.ok().and_then(|v| v.get("uid").cloned()), Some(json!("u1")));
}

#[tokio::test]
async fn test_token_introspection_posts_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/introspect"))
        .and(body_json(json!({ "token": "access-123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "active": true })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).fetch_token().await;

    assert_eq!(outcome, Ok(json!({ "active": true })));
}

#[tokio::test]
async fn test_create_subscription_posts_camel_case_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth/subscriptions/active"))
        .and(body_json(json!({ "paymentToken": "tok_1", "planId": "p1", "displayName": "Jo" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "subscriptionId": "sub_9" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .create_subscription(CreateSubscriptionParams {
            payment_token: "tok_1".to_string(),
            plan_id: "p1".to_string(),
            display_name: "Jo".to_string(),
        })
        .await;

    assert_eq!(outcome, Ok(json!({ "subscriptionId": "sub_9" })));
}

#[tokio::test]
async fn test_cancel_subscription_deletes_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/oauth/subscriptions/active/sub_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "subscriptionId": "sub_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).cancel_subscription("sub_1".to_string()).await;

    assert_eq!(outcome, Ok(json!({ "subscriptionId": "sub_1" })));
}

#[tokio::test]
async fn test_reactivate_and_update_payment_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth/subscriptions/reactivate"))
        .and(body_json(json!({ "subscriptionId": "sub_1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth/subscriptions/updatePayment"))
        .and(body_json(json!({ "paymentToken": "tok_2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(client.reactivate_subscription("sub_1".to_string()).await, Ok(json!({})));
    assert_eq!(client.update_payment("tok_2".to_string()).await, Ok(json!({})));
}

#[tokio::test]
async fn test_error_status_parses_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/oauth/subscriptions/customer"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "not_found",
            "errno": 176,
            "error": "Not Found",
            "message": "Unknown customer"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_customer().await.err().unwrap_or_default();

    assert_eq!(error.code.as_deref(), Some("not_found"));
    assert_eq!(error.errno, Some(176));
    assert_eq!(error.status_code, Some(404));
    assert_eq!(error.message.as_deref(), Some("Unknown customer"));
}

#[tokio::test]
async fn test_error_body_with_numeric_code_keeps_every_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth/subscriptions/updatePayment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "errno": 107,
            "error": "Bad Request",
            "message": "Invalid parameter"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .update_payment("tok_bad".to_string())
        .await
        .err()
        .unwrap_or_default();

    assert_eq!(error.code.as_deref(), Some("400"));
    assert_eq!(error.status_code, Some(400));
    assert_eq!(error.errno, Some(107));
    assert_eq!(error.error.as_deref(), Some("Bad Request"));
    assert_eq!(error.message.as_deref(), Some("Invalid parameter"));
}

#[tokio::test]
async fn test_error_status_without_json_body_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/oauth/subscriptions/active"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_subscriptions().await.err().unwrap_or_default();

    assert_eq!(error.status_code, Some(503));
    assert_eq!(error.code, None);
}

#[tokio::test]
async fn test_success_with_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/oauth/subscriptions/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let error = client_for(&server).fetch_plans().await.err().unwrap_or_default();

    assert_eq!(error.code.as_deref(), Some("invalid_response"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let servers = ServerUrls {
        auth_url: "http://127.0.0.1:1".to_string(),
        oauth_url: "http://127.0.0.1:1".to_string(),
        profile_url: "http://127.0.0.1:1".to_string(),
    };

    let error = HttpPaymentsApi::new(servers, "t").fetch_plans().await.err().unwrap_or_default();

    assert_eq!(error.code.as_deref(), Some("network_error"));
}
