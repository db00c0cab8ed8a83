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

use crate::application::dto::delivery_query::{DeliveryLogResponseDto, DeliveryQueryDto};
use crate::domain::models::delivery::DeliveryStatus;
use crate::domain::models::event::WebhookEventType;
use crate::domain::repositories::delivery_repository::{DeliveryQueryParams, DeliveryRepository};
use crate::presentation::errors::AppError;
use crate::utils::validators::ValidationError;
use axum::extract::{Path, Query};
use axum::{Extension, Json};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 将查询DTO转换为仓库查询参数
///
/// 非法的状态或事件标识同步返回校验错误
fn build_query_params(query: DeliveryQueryDto) -> Result<DeliveryQueryParams, AppError> {
    if let Err(errors) = query.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }

    let statuses = query
        .status
        .map(|s| {
            s.parse::<DeliveryStatus>()
                .map(|status| vec![status])
                .map_err(|_| ValidationError::InvalidFilter(format!("unknown status: {}", s)))
        })
        .transpose()?;

    let event = query
        .event
        .map(|e| {
            e.parse::<WebhookEventType>()
                .map_err(|_| ValidationError::UnknownEvent(e.clone()))
        })
        .transpose()?;

    Ok(DeliveryQueryParams {
        tenant_id: query.tenant_id,
        webhook_id: query.webhook_id,
        statuses,
        event,
        created_after: query.created_after,
        created_before: query.created_before,
        limit: query.limit.unwrap_or(100).min(1000),
        offset: query.offset.unwrap_or(0),
    })
}

/// 查询单个Webhook的投递日志
pub async fn list_webhook_deliveries<R: DeliveryRepository>(
    Extension(repo): Extension<Arc<R>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeliveryQueryDto>,
) -> Result<Json<DeliveryLogResponseDto>, AppError> {
    let mut params = build_query_params(query)?;
    params.webhook_id = Some(id);

    let limit = params.limit;
    let offset = params.offset;
    let (deliveries, total) = repo.list(params).await?;

    Ok(Json(DeliveryLogResponseDto {
        deliveries,
        total,
        limit,
        offset,
    }))
}

/// 查询租户全量投递日志
pub async fn list_deliveries<R: DeliveryRepository>(
    Extension(repo): Extension<Arc<R>>,
    Query(query): Query<DeliveryQueryDto>,
) -> Result<Json<DeliveryLogResponseDto>, AppError> {
    let params = build_query_params(query)?;

    let limit = params.limit;
    let offset = params.offset;
    let (deliveries, total) = repo.list(params).await?;

    Ok(Json(DeliveryLogResponseDto {
        deliveries,
        total,
        limit,
        offset,
    }))
}
