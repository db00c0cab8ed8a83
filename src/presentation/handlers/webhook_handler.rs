// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::application::dto::webhook_request::{
    CreateWebhookDto, ListWebhooksQuery, TenantQuery, UpdateWebhookDto, WebhookListResponseDto,
};
use crate::domain::models::webhook::WebhookConfig;
use crate::domain::repositories::webhook_repository::{
    RepositoryError, WebhookQueryParams, WebhookRepository,
};
use crate::domain::services::transport::WebhookTransport;
use crate::domain::use_cases::create_webhook::{CreateWebhookInput, CreateWebhookUseCase};
use crate::domain::use_cases::test_webhook::{TestWebhookUseCase, WebhookTestOutcome};
use crate::domain::use_cases::update_webhook::{UpdateWebhookInput, UpdateWebhookUseCase};
use crate::presentation::errors::AppError;
use axum::extract::{Path, Query};
use axum::{http::StatusCode, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_webhook<R: WebhookRepository>(
    Extension(repo): Extension<Arc<R>>,
    Json(payload): Json<CreateWebhookDto>,
) -> Result<(StatusCode, Json<WebhookConfig>), AppError> {
    let use_case = CreateWebhookUseCase::new(repo);
    let input = CreateWebhookInput {
        url: payload.url,
        events: payload.events,
        secret: payload.secret,
        retry_count: payload.retry_count,
        timeout_ms: payload.timeout_ms,
        headers: payload.headers,
        is_active: payload.is_active,
    };
    let config = use_case.execute(payload.tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(config)))
}

pub async fn update_webhook<R: WebhookRepository>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWebhookDto>,
) -> Result<Json<WebhookConfig>, AppError> {
    let use_case = UpdateWebhookUseCase::new(repo);
    let input = UpdateWebhookInput {
        url: payload.url,
        events: payload.events,
        secret: payload.secret,
        retry_count: payload.retry_count,
        timeout_ms: payload.timeout_ms,
        headers: payload.headers,
        is_active: payload.is_active,
    };
    let config = use_case.execute(id, payload.tenant_id, input).await?;
    Ok(Json(config))
}

pub async fn get_webhook<R: WebhookRepository>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<WebhookConfig>, AppError> {
    let config = repo
        .find_by_id(id, query.tenant_id)
        .await?
        .filter(|c| c.deleted_at.is_none())
        .ok_or(RepositoryError::NotFound)?;
    Ok(Json(config))
}

pub async fn list_webhooks<R: WebhookRepository>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<ListWebhooksQuery>,
) -> Result<Json<WebhookListResponseDto>, AppError> {
    let limit = query.limit.unwrap_or(100).min(1000);
    let offset = query.offset.unwrap_or(0);

    let (webhooks, total) = repo
        .list(WebhookQueryParams {
            tenant_id: query.tenant_id,
            is_active: query.is_active,
            limit,
            offset,
        })
        .await?;

    Ok(Json(WebhookListResponseDto {
        webhooks,
        total,
        limit,
        offset,
    }))
}

pub async fn delete_webhook<R: WebhookRepository>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<StatusCode, AppError> {
    repo.soft_delete(id, query.tenant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn test_webhook<W: WebhookRepository, T: WebhookTransport>(
    Extension(use_case): Extension<Arc<TestWebhookUseCase<W, T>>>,
    Path(id): Path<Uuid>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<WebhookTestOutcome>, AppError> {
    let outcome = use_case.execute(id, query.tenant_id).await?;
    Ok(Json(outcome))
}
