// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    make_config, make_executor, start_capture_server, InMemoryDeliveryRepo, InMemoryWebhookRepo,
};
use axum::http::StatusCode;
use hookrs::domain::models::delivery::DeliveryStatus;
use hookrs::domain::models::event::WebhookEventType;
use hookrs::domain::models::payload::DispatchOptions;
use hookrs::domain::repositories::webhook_repository::WebhookRepository;
use hookrs::domain::use_cases::dispatch_event::DispatchEventUseCase;
use hookrs::infrastructure::services::http_transport::HttpTransport;
use hookrs::workers::retry_worker::RetryWorker;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_options() -> DispatchOptions {
    DispatchOptions {
        entity_type: "opportunity".to_string(),
        entity_id: "opp-9".to_string(),
        action: "won".to_string(),
        current: serde_json::json!({"amount": 125000}),
        ..Default::default()
    }
}

struct Harness {
    webhook_repo: Arc<InMemoryWebhookRepo>,
    delivery_repo: Arc<InMemoryDeliveryRepo>,
    dispatcher: DispatchEventUseCase<InMemoryWebhookRepo, InMemoryDeliveryRepo, HttpTransport>,
    worker: RetryWorker<InMemoryWebhookRepo, InMemoryDeliveryRepo, HttpTransport>,
}

fn make_harness() -> Harness {
    let webhook_repo = Arc::new(InMemoryWebhookRepo::new());
    let delivery_repo = Arc::new(InMemoryDeliveryRepo::new());
    let executor = make_executor();

    let dispatcher = DispatchEventUseCase::new(
        webhook_repo.clone(),
        delivery_repo.clone(),
        executor.clone(),
        10,
    );
    let worker = RetryWorker::new(
        webhook_repo.clone(),
        delivery_repo.clone(),
        executor,
        Duration::from_secs(5),
        100,
        10,
    );

    Harness {
        webhook_repo,
        delivery_repo,
        dispatcher,
        worker,
    }
}

#[tokio::test]
async fn test_always_failing_receiver_exhausts_exactly_max_attempts() {
    let harness = make_harness();
    let tenant_id = Uuid::new_v4();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let url = format!("{}/hook", server.uri());
    let config = make_config(tenant_id, &url, vec![WebhookEventType::OpportunityWon]);
    harness.webhook_repo.create(&config).await.unwrap();

    // Attempt 1 via dispatch
    let results = harness
        .dispatcher
        .execute(tenant_id, WebhookEventType::OpportunityWon, sample_options())
        .await
        .unwrap();
    let delivery_id = results[0].delivery_id;

    // Attempts 2 and 3 via the scheduler
    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();
    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();

    let delivery = harness.delivery_repo.get(delivery_id).unwrap();
    assert_eq!(delivery.status, DeliveryStatus::Failed);
    assert_eq!(delivery.attempt_number, 3);
    assert!(delivery.next_retry_at.is_none());
    assert!(delivery.delivered_at.is_none());

    // Exhausted delivery is no longer picked up; the mock's expect(3)
    // is verified when the server drops
    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();
    let delivery = harness.delivery_repo.get(delivery_id).unwrap();
    assert_eq!(delivery.attempt_number, 3);
}

#[tokio::test]
async fn test_failure_then_success_recovers_on_second_attempt() {
    let harness = make_harness();
    let tenant_id = Uuid::new_v4();

    let server = MockServer::start().await;
    // First attempt fails, every later one succeeds
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/hook", server.uri());
    let config = make_config(tenant_id, &url, vec![WebhookEventType::OpportunityWon]);
    harness.webhook_repo.create(&config).await.unwrap();

    let results = harness
        .dispatcher
        .execute(tenant_id, WebhookEventType::OpportunityWon, sample_options())
        .await
        .unwrap();
    let delivery_id = results[0].delivery_id;
    assert_eq!(results[0].status, DeliveryStatus::Retrying);

    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();

    let delivery = harness.delivery_repo.get(delivery_id).unwrap();
    assert_eq!(delivery.status, DeliveryStatus::Success);
    assert_eq!(delivery.attempt_number, 2);
    assert!(delivery.delivered_at.is_some());
    assert!(delivery.next_retry_at.is_none());
    assert_eq!(delivery.response_status, Some(200));
}

#[tokio::test]
async fn test_deactivated_webhook_fails_retry_without_http_attempt() {
    let harness = make_harness();
    let tenant_id = Uuid::new_v4();

    let (url, captured) = start_capture_server(StatusCode::INTERNAL_SERVER_ERROR).await;

    let config = make_config(tenant_id, &url, vec![WebhookEventType::LeadConverted]);
    harness.webhook_repo.create(&config).await.unwrap();

    let results = harness
        .dispatcher
        .execute(tenant_id, WebhookEventType::LeadConverted, sample_options())
        .await
        .unwrap();
    let delivery_id = results[0].delivery_id;
    assert_eq!(captured.lock().unwrap().len(), 1);

    // Operator disables the webhook while a retry is pending
    let mut disabled = config.clone();
    disabled.is_active = false;
    harness.webhook_repo.update(&disabled).await.unwrap();

    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();

    let delivery = harness.delivery_repo.get(delivery_id).unwrap();
    assert_eq!(delivery.status, DeliveryStatus::Failed);
    assert_eq!(
        delivery.error_message.as_deref(),
        Some("webhook no longer active")
    );
    assert!(delivery.next_retry_at.is_none());
    // No HTTP attempt was consumed
    assert_eq!(delivery.attempt_number, 1);
    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleted_webhook_orphans_pending_retry() {
    let harness = make_harness();
    let tenant_id = Uuid::new_v4();

    let (url, captured) = start_capture_server(StatusCode::SERVICE_UNAVAILABLE).await;

    let config = make_config(tenant_id, &url, vec![WebhookEventType::LeadCreated]);
    harness.webhook_repo.create(&config).await.unwrap();

    let results = harness
        .dispatcher
        .execute(tenant_id, WebhookEventType::LeadCreated, sample_options())
        .await
        .unwrap();
    let delivery_id = results[0].delivery_id;

    harness
        .webhook_repo
        .soft_delete(config.id, tenant_id)
        .await
        .unwrap();

    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();

    let delivery = harness.delivery_repo.get(delivery_id).unwrap();
    assert_eq!(delivery.status, DeliveryStatus::Failed);
    assert_eq!(
        delivery.error_message.as_deref(),
        Some("webhook no longer active")
    );
    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_signature_and_body_identical_across_attempts() {
    let harness = make_harness();
    let tenant_id = Uuid::new_v4();

    let (url, captured) = start_capture_server(StatusCode::INTERNAL_SERVER_ERROR).await;

    let config = make_config(tenant_id, &url, vec![WebhookEventType::LeadCreated]);
    harness.webhook_repo.create(&config).await.unwrap();

    harness
        .dispatcher
        .execute(tenant_id, WebhookEventType::LeadCreated, sample_options())
        .await
        .unwrap();

    harness.delivery_repo.rewind_due();
    harness.worker.process_due_retries().await.unwrap();

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 2);

    let (first_headers, first_body) = &requests[0];
    let (retry_headers, retry_body) = &requests[1];

    // The frozen envelope re-serializes to the same bytes, so the
    // signature the receiver verifies is identical on every attempt
    assert_eq!(first_body, retry_body);
    assert_eq!(
        first_headers.get("x-webhook-signature").unwrap(),
        retry_headers.get("x-webhook-signature").unwrap()
    );
    assert_eq!(
        first_headers.get("x-webhook-id").unwrap(),
        retry_headers.get("x-webhook-id").unwrap()
    );
}
