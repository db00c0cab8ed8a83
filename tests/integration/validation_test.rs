// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{make_config, make_executor, InMemoryWebhookRepo, TEST_SECRET};
use hookrs::domain::models::event::WebhookEventType;
use hookrs::domain::repositories::webhook_repository::{
    RepositoryError, WebhookQueryParams, WebhookRepository,
};
use hookrs::domain::use_cases::create_webhook::{CreateWebhookInput, CreateWebhookUseCase};
use hookrs::domain::use_cases::test_webhook::TestWebhookUseCase;
use hookrs::domain::use_cases::update_webhook::{UpdateWebhookInput, UpdateWebhookUseCase};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn valid_input() -> CreateWebhookInput {
    CreateWebhookInput {
        url: "https://example.com/hooks/crm".to_string(),
        events: vec!["lead.created".to_string(), "opportunity.won".to_string()],
        secret: TEST_SECRET.to_string(),
        retry_count: None,
        timeout_ms: None,
        headers: None,
        is_active: None,
    }
}

async fn assert_nothing_persisted(repo: &InMemoryWebhookRepo, tenant_id: Uuid) {
    let (configs, total) = repo
        .list(WebhookQueryParams {
            tenant_id,
            is_active: None,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(configs.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_create_rejects_bad_scheme() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = CreateWebhookUseCase::new(repo.clone());
    let tenant_id = Uuid::new_v4();

    let input = CreateWebhookInput {
        url: "ftp://x.com".to_string(),
        ..valid_input()
    };
    let result = use_case.execute(tenant_id, input).await;

    assert!(result.is_err());
    assert_nothing_persisted(&repo, tenant_id).await;
}

#[tokio::test]
async fn test_create_rejects_empty_events() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = CreateWebhookUseCase::new(repo.clone());
    let tenant_id = Uuid::new_v4();

    let input = CreateWebhookInput {
        events: vec![],
        ..valid_input()
    };
    let result = use_case.execute(tenant_id, input).await;

    assert!(result.is_err());
    assert_nothing_persisted(&repo, tenant_id).await;
}

#[tokio::test]
async fn test_create_rejects_unknown_event() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = CreateWebhookUseCase::new(repo.clone());
    let tenant_id = Uuid::new_v4();

    let input = CreateWebhookInput {
        events: vec!["lead.created".to_string(), "invoice.paid".to_string()],
        ..valid_input()
    };
    let result = use_case.execute(tenant_id, input).await;

    assert!(result.is_err());
    assert_nothing_persisted(&repo, tenant_id).await;
}

#[tokio::test]
async fn test_create_rejects_short_secret() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = CreateWebhookUseCase::new(repo.clone());
    let tenant_id = Uuid::new_v4();

    let input = CreateWebhookInput {
        secret: "short".to_string(),
        ..valid_input()
    };
    let result = use_case.execute(tenant_id, input).await;

    assert!(result.is_err());
    assert_nothing_persisted(&repo, tenant_id).await;
}

#[tokio::test]
async fn test_create_persists_valid_config_with_defaults() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = CreateWebhookUseCase::new(repo.clone());
    let tenant_id = Uuid::new_v4();

    let config = use_case.execute(tenant_id, valid_input()).await.unwrap();

    assert!(config.is_active);
    assert_eq!(config.retry_count, 3);
    assert_eq!(config.timeout_ms, 5000);
    assert_eq!(
        config.events,
        vec![
            WebhookEventType::LeadCreated,
            WebhookEventType::OpportunityWon
        ]
    );

    let stored = repo
        .find_by_id(config.id, tenant_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.url, "https://example.com/hooks/crm");
}

#[tokio::test]
async fn test_update_rejects_invalid_changes_and_keeps_original() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let tenant_id = Uuid::new_v4();

    let config = make_config(
        tenant_id,
        "https://example.com/hooks",
        vec![WebhookEventType::LeadCreated],
    );
    repo.create(&config).await.unwrap();

    let use_case = UpdateWebhookUseCase::new(repo.clone());
    let result = use_case
        .execute(
            config.id,
            tenant_id,
            UpdateWebhookInput {
                url: Some("gopher://old.example".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(result.is_err());

    let stored = repo
        .find_by_id(config.id, tenant_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.url, "https://example.com/hooks");
}

#[tokio::test]
async fn test_update_missing_webhook_is_not_found() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = UpdateWebhookUseCase::new(repo);

    let result = use_case
        .execute(
            Uuid::new_v4(),
            Uuid::new_v4(),
            UpdateWebhookInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RepositoryError>(),
        Some(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_webhook_round_trip_against_healthy_receiver() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let tenant_id = Uuid::new_v4();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/hook", server.uri());
    let config = make_config(tenant_id, &url, vec![WebhookEventType::LeadCreated]);
    repo.create(&config).await.unwrap();

    let use_case = TestWebhookUseCase::new(repo, make_executor());
    let outcome = use_case.execute(config.id, tenant_id).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status_code, Some(200));
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_webhook_reports_timeout_against_hanging_receiver() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let tenant_id = Uuid::new_v4();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let url = format!("{}/hook", server.uri());
    let mut config = make_config(tenant_id, &url, vec![WebhookEventType::LeadCreated]);
    config.timeout_ms = 100;
    repo.create(&config).await.unwrap();

    let use_case = TestWebhookUseCase::new(repo, make_executor());
    let outcome = use_case.execute(config.id, tenant_id).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_webhook_unknown_id_is_not_found() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let use_case = TestWebhookUseCase::new(repo, make_executor());

    let result = use_case.execute(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_soft_deleted_webhook_hidden_from_listing_and_test() {
    let repo = Arc::new(InMemoryWebhookRepo::new());
    let tenant_id = Uuid::new_v4();

    let config = make_config(
        tenant_id,
        "https://example.com/hooks",
        vec![WebhookEventType::LeadCreated],
    );
    repo.create(&config).await.unwrap();
    repo.soft_delete(config.id, tenant_id).await.unwrap();

    let (configs, total) = repo
        .list(WebhookQueryParams {
            tenant_id,
            is_active: None,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(configs.is_empty());
    assert_eq!(total, 0);

    let use_case = TestWebhookUseCase::new(repo, make_executor());
    let result = use_case.execute(config.id, tenant_id).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}
