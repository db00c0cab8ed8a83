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

use crate::application::dto::dispatch_request::DispatchRequestDto;
use crate::domain::models::event::WebhookEventType;
use crate::domain::repositories::delivery_repository::DeliveryRepository;
use crate::domain::repositories::webhook_repository::WebhookRepository;
use crate::domain::services::transport::WebhookTransport;
use crate::domain::use_cases::dispatch_event::{DispatchEventUseCase, DispatchResult};
use crate::presentation::errors::AppError;
use crate::utils::validators::ValidationError;
use axum::{Extension, Json};
use std::sync::Arc;

/// 事件分发处理器
///
/// 单个目标的投递失败以结果数据返回，不会使本请求失败
pub async fn dispatch_event<W, D, T>(
    Extension(use_case): Extension<Arc<DispatchEventUseCase<W, D, T>>>,
    Json(payload): Json<DispatchRequestDto>,
) -> Result<Json<Vec<DispatchResult>>, AppError>
where
    W: WebhookRepository,
    D: DeliveryRepository,
    T: WebhookTransport,
{
    let event: WebhookEventType = payload
        .event
        .parse()
        .map_err(|_| ValidationError::UnknownEvent(payload.event.clone()))?;

    let tenant_id = payload.tenant_id;
    let results = use_case.execute(tenant_id, event, payload.into()).await?;
    Ok(Json(results))
}
