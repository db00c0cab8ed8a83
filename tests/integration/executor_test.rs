// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{make_executor, TEST_SECRET};
use hookrs::domain::models::event::WebhookEventType;
use hookrs::domain::models::payload::{DispatchOptions, WebhookPayload};
use hookrs::domain::services::delivery_executor::{DeliveryTarget, RESPONSE_BODY_LIMIT};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_envelope() -> serde_json::Value {
    let payload = WebhookPayload::build(
        Uuid::new_v4(),
        WebhookEventType::LeadCreated,
        DispatchOptions {
            entity_type: "lead".to_string(),
            entity_id: "lead-1".to_string(),
            action: "created".to_string(),
            current: serde_json::json!({"name": "Grace"}),
            ..Default::default()
        },
    );
    serde_json::to_value(&payload).unwrap()
}

fn make_target<'a>(url: &'a str, headers: &'a HashMap<String, String>) -> DeliveryTarget<'a> {
    DeliveryTarget {
        url,
        secret: TEST_SECRET,
        timeout_ms: 5000,
        headers,
    }
}

#[tokio::test]
async fn test_attempt_succeeds_on_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let executor = make_executor();
    let url = format!("{}/hook", server.uri());
    let no_headers = HashMap::new();

    let result = executor
        .attempt(
            &make_target(&url, &no_headers),
            WebhookEventType::LeadCreated,
            &sample_envelope(),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.status_code, Some(204));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_attempt_fails_on_non_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such hook"))
        .mount(&server)
        .await;

    let executor = make_executor();
    let url = format!("{}/hook", server.uri());
    let no_headers = HashMap::new();

    let result = executor
        .attempt(
            &make_target(&url, &no_headers),
            WebhookEventType::LeadCreated,
            &sample_envelope(),
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.status_code, Some(404));
    assert_eq!(result.response_body.as_deref(), Some("no such hook"));
}

#[tokio::test]
async fn test_attempt_times_out_with_descriptive_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let executor = make_executor();
    let url = format!("{}/hook", server.uri());
    let no_headers = HashMap::new();
    let target = DeliveryTarget {
        url: &url,
        secret: TEST_SECRET,
        timeout_ms: 100,
        headers: &no_headers,
    };

    let result = executor
        .attempt(&target, WebhookEventType::LeadCreated, &sample_envelope())
        .await;

    assert!(!result.success);
    assert!(result.status_code.is_none());
    let error = result.error.unwrap();
    assert!(error.contains("timed out"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_attempt_classifies_connection_failure() {
    let executor = make_executor();
    let no_headers = HashMap::new();
    // Nothing listens on port 9; the connection is refused
    let target = DeliveryTarget {
        url: "http://127.0.0.1:9/hook",
        secret: TEST_SECRET,
        timeout_ms: 1000,
        headers: &no_headers,
    };

    let result = executor
        .attempt(&target, WebhookEventType::LeadCreated, &sample_envelope())
        .await;

    assert!(!result.success);
    assert!(result.status_code.is_none());
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_attempt_truncates_oversized_response_body() {
    let server = MockServer::start().await;
    let huge_body = "x".repeat(RESPONSE_BODY_LIMIT + 5000);
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string(huge_body))
        .mount(&server)
        .await;

    let executor = make_executor();
    let url = format!("{}/hook", server.uri());
    let no_headers = HashMap::new();

    let result = executor
        .attempt(
            &make_target(&url, &no_headers),
            WebhookEventType::LeadCreated,
            &sample_envelope(),
        )
        .await;

    assert_eq!(
        result.response_body.map(|b| b.len()),
        Some(RESPONSE_BODY_LIMIT)
    );
}

#[tokio::test]
async fn test_attempt_forwards_custom_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("X-Api-Key", "operator-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let executor = make_executor();
    let url = format!("{}/hook", server.uri());
    let mut custom = HashMap::new();
    custom.insert("X-Api-Key".to_string(), "operator-key".to_string());

    let result = executor
        .attempt(
            &make_target(&url, &custom),
            WebhookEventType::LeadCreated,
            &sample_envelope(),
        )
        .await;

    assert!(result.success);
}
