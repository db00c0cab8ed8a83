// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    make_config, make_executor, start_capture_server, InMemoryDeliveryRepo, InMemoryWebhookRepo,
    TEST_SECRET, TEST_USER_AGENT,
};
use axum::http::StatusCode;
use hookrs::domain::models::delivery::DeliveryStatus;
use hookrs::domain::models::event::WebhookEventType;
use hookrs::domain::models::payload::DispatchOptions;
use hookrs::domain::repositories::webhook_repository::WebhookRepository;
use hookrs::domain::use_cases::dispatch_event::DispatchEventUseCase;
use hookrs::utils::signature::verify_signature;
use std::sync::Arc;
use uuid::Uuid;

fn sample_options() -> DispatchOptions {
    DispatchOptions {
        entity_type: "lead".to_string(),
        entity_id: "lead-42".to_string(),
        action: "created".to_string(),
        current: serde_json::json!({"name": "Ada Lovelace", "source": "import"}),
        actor_id: Some("user-7".to_string()),
        ..Default::default()
    }
}

fn make_dispatcher(
    webhook_repo: Arc<InMemoryWebhookRepo>,
    delivery_repo: Arc<InMemoryDeliveryRepo>,
) -> DispatchEventUseCase<
    InMemoryWebhookRepo,
    InMemoryDeliveryRepo,
    hookrs::infrastructure::services::http_transport::HttpTransport,
> {
    DispatchEventUseCase::new(webhook_repo, delivery_repo, make_executor(), 10)
}

#[tokio::test]
async fn test_dispatch_creates_one_delivery_per_matching_config() {
    let webhook_repo = Arc::new(InMemoryWebhookRepo::new());
    let delivery_repo = Arc::new(InMemoryDeliveryRepo::new());
    let tenant_id = Uuid::new_v4();

    let (url, _captured) = start_capture_server(StatusCode::OK).await;

    // Two matching configs, one inactive, one subscribed to another event
    let matching_a = make_config(tenant_id, &url, vec![WebhookEventType::LeadCreated]);
    let matching_b = make_config(
        tenant_id,
        &url,
        vec![
            WebhookEventType::LeadCreated,
            WebhookEventType::OpportunityWon,
        ],
    );
    let mut inactive = make_config(tenant_id, &url, vec![WebhookEventType::LeadCreated]);
    inactive.is_active = false;
    let other_event = make_config(tenant_id, &url, vec![WebhookEventType::ContactCreated]);

    for config in [&matching_a, &matching_b, &inactive, &other_event] {
        webhook_repo.create(config).await.unwrap();
    }

    let dispatcher = make_dispatcher(webhook_repo, delivery_repo.clone());
    let results = dispatcher
        .execute(tenant_id, WebhookEventType::LeadCreated, sample_options())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
    assert!(results
        .iter()
        .all(|r| r.status == DeliveryStatus::Success));

    let deliveries = delivery_repo.all();
    assert_eq!(deliveries.len(), 2);
    let delivered_to: Vec<Uuid> = deliveries.iter().map(|d| d.webhook_id).collect();
    assert!(delivered_to.contains(&matching_a.id));
    assert!(delivered_to.contains(&matching_b.id));
}

#[tokio::test]
async fn test_dispatch_without_subscribers_is_a_noop() {
    let webhook_repo = Arc::new(InMemoryWebhookRepo::new());
    let delivery_repo = Arc::new(InMemoryDeliveryRepo::new());

    let dispatcher = make_dispatcher(webhook_repo, delivery_repo.clone());
    let results = dispatcher
        .execute(
            Uuid::new_v4(),
            WebhookEventType::OpportunityWon,
            sample_options(),
        )
        .await
        .unwrap();

    assert!(results.is_empty());
    assert!(delivery_repo.all().is_empty());
}

#[tokio::test]
async fn test_dispatch_isolates_per_target_failures() {
    let webhook_repo = Arc::new(InMemoryWebhookRepo::new());
    let delivery_repo = Arc::new(InMemoryDeliveryRepo::new());
    let tenant_id = Uuid::new_v4();

    let (ok_url, _ok_captured) = start_capture_server(StatusCode::OK).await;
    let (bad_url, _bad_captured) =
        start_capture_server(StatusCode::INTERNAL_SERVER_ERROR).await;

    let healthy = make_config(tenant_id, &ok_url, vec![WebhookEventType::LeadCreated]);
    let failing = make_config(tenant_id, &bad_url, vec![WebhookEventType::LeadCreated]);
    webhook_repo.create(&healthy).await.unwrap();
    webhook_repo.create(&failing).await.unwrap();

    let dispatcher = make_dispatcher(webhook_repo, delivery_repo.clone());
    let results = dispatcher
        .execute(tenant_id, WebhookEventType::LeadCreated, sample_options())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let healthy_result = results.iter().find(|r| r.webhook_id == healthy.id).unwrap();
    let failing_result = results.iter().find(|r| r.webhook_id == failing.id).unwrap();

    assert!(healthy_result.success);
    assert_eq!(healthy_result.status, DeliveryStatus::Success);
    assert!(!failing_result.success);
    assert_eq!(failing_result.status, DeliveryStatus::Retrying);

    // Both outcomes persisted independently
    let failing_delivery = delivery_repo.get(failing_result.delivery_id).unwrap();
    assert_eq!(failing_delivery.response_status, Some(500));
    assert!(failing_delivery.next_retry_at.is_some());
}

#[tokio::test]
async fn test_dispatch_sends_contract_headers_and_valid_signature() {
    let webhook_repo = Arc::new(InMemoryWebhookRepo::new());
    let delivery_repo = Arc::new(InMemoryDeliveryRepo::new());
    let tenant_id = Uuid::new_v4();

    let (url, captured) = start_capture_server(StatusCode::OK).await;

    let mut config = make_config(tenant_id, &url, vec![WebhookEventType::OpportunityWon]);
    config
        .headers
        .insert("X-Api-Key".to_string(), "operator-key".to_string());
    webhook_repo.create(&config).await.unwrap();

    let dispatcher = make_dispatcher(webhook_repo, delivery_repo);
    let results = dispatcher
        .execute(tenant_id, WebhookEventType::OpportunityWon, sample_options())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];

    assert_eq!(headers.get("content-type").unwrap(), "application/json");
    assert_eq!(headers.get("user-agent").unwrap(), TEST_USER_AGENT);
    assert_eq!(
        headers.get("x-webhook-event").unwrap(),
        "opportunity.won"
    );
    assert_eq!(headers.get("x-api-key").unwrap(), "operator-key");
    assert!(headers.contains_key("x-webhook-timestamp"));

    let payload_id = headers.get("x-webhook-id").unwrap().to_str().unwrap();
    assert!(payload_id.starts_with("evt_"));

    // Receiver-side verification over the raw body must succeed
    let signature = headers
        .get("x-webhook-signature")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(signature.starts_with("sha256="));
    assert!(verify_signature(signature, body, TEST_SECRET));

    let envelope: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert_eq!(envelope["event"], "opportunity.won");
    assert_eq!(envelope["data"]["entity_id"], "lead-42");
    assert_eq!(envelope["id"].as_str().unwrap(), payload_id);
}
