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

use crate::domain::models::delivery::{DeliveryStatus, WebhookDelivery};
use crate::domain::repositories::delivery_repository::{
    DeliveryQueryParams, DeliveryRepository,
};
use crate::domain::repositories::webhook_repository::RepositoryError;
use crate::infrastructure::database::entities::webhook_delivery::{self, SeaDeliveryStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 投递记录仓库实现
#[derive(Clone)]
pub struct DeliveryRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl DeliveryRepoImpl {
    /// 创建新的投递记录仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<DeliveryStatus> for SeaDeliveryStatus {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Pending => SeaDeliveryStatus::Pending,
            DeliveryStatus::Success => SeaDeliveryStatus::Success,
            DeliveryStatus::Retrying => SeaDeliveryStatus::Retrying,
            DeliveryStatus::Failed => SeaDeliveryStatus::Failed,
        }
    }
}

impl From<SeaDeliveryStatus> for DeliveryStatus {
    fn from(status: SeaDeliveryStatus) -> Self {
        match status {
            SeaDeliveryStatus::Pending => DeliveryStatus::Pending,
            SeaDeliveryStatus::Success => DeliveryStatus::Success,
            SeaDeliveryStatus::Retrying => DeliveryStatus::Retrying,
            SeaDeliveryStatus::Failed => DeliveryStatus::Failed,
        }
    }
}

#[async_trait]
impl DeliveryRepository for DeliveryRepoImpl {
    async fn create(
        &self,
        delivery: &WebhookDelivery,
    ) -> Result<WebhookDelivery, RepositoryError> {
        let active_model = webhook_delivery::ActiveModel {
            id: Set(delivery.id),
            tenant_id: Set(delivery.tenant_id),
            webhook_id: Set(delivery.webhook_id),
            webhook_url: Set(delivery.webhook_url.clone()),
            event: Set(delivery.event.to_string()),
            payload: Set(delivery.payload.clone()),
            status: Set(delivery.status.into()),
            attempt_number: Set(delivery.attempt_number),
            max_attempts: Set(delivery.max_attempts),
            response_status: Set(delivery.response_status),
            response_body: Set(delivery.response_body.clone()),
            response_headers: Set(delivery.response_headers.clone()),
            error_message: Set(delivery.error_message.clone()),
            duration_ms: Set(delivery.duration_ms),
            next_retry_at: Set(delivery.next_retry_at.map(Into::into)),
            delivered_at: Set(delivery.delivered_at.map(Into::into)),
            created_at: Set(delivery.created_at.into()),
            updated_at: Set(delivery.updated_at.into()),
        };

        webhook_delivery::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(delivery.clone())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<WebhookDelivery>, RepositoryError> {
        let model = webhook_delivery::Entity::find_by_id(id)
            .filter(webhook_delivery::Column::TenantId.eq(tenant_id))
            .one(self.db.as_ref())
            .await?;

        model.map(WebhookDelivery::try_from).transpose()
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<WebhookDelivery>, RepositoryError> {
        let models = webhook_delivery::Entity::find()
            .filter(webhook_delivery::Column::Status.eq(SeaDeliveryStatus::Retrying))
            .filter(webhook_delivery::Column::NextRetryAt.lte(now))
            .order_by_asc(webhook_delivery::Column::NextRetryAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        models
            .into_iter()
            .map(WebhookDelivery::try_from)
            .collect()
    }

    async fn update(
        &self,
        delivery: &WebhookDelivery,
    ) -> Result<WebhookDelivery, RepositoryError> {
        let mut active: webhook_delivery::ActiveModel =
            webhook_delivery::Entity::find_by_id(delivery.id)
                .one(self.db.as_ref())
                .await?
                .ok_or(RepositoryError::NotFound)?
                .into();

        active.status = Set(delivery.status.into());
        active.attempt_number = Set(delivery.attempt_number);
        active.response_status = Set(delivery.response_status);
        active.response_body = Set(delivery.response_body.clone());
        active.response_headers = Set(delivery.response_headers.clone());
        active.error_message = Set(delivery.error_message.clone());
        active.duration_ms = Set(delivery.duration_ms);
        active.next_retry_at = Set(delivery.next_retry_at.map(Into::into));
        active.delivered_at = Set(delivery.delivered_at.map(Into::into));
        active.updated_at = Set(delivery.updated_at.into());

        let updated_model = active.update(self.db.as_ref()).await?;

        WebhookDelivery::try_from(updated_model)
    }

    async fn list(
        &self,
        params: DeliveryQueryParams,
    ) -> Result<(Vec<WebhookDelivery>, u64), RepositoryError> {
        let mut query = webhook_delivery::Entity::find()
            .filter(webhook_delivery::Column::TenantId.eq(params.tenant_id));

        if let Some(webhook_id) = params.webhook_id {
            query = query.filter(webhook_delivery::Column::WebhookId.eq(webhook_id));
        }
        if let Some(statuses) = params.statuses {
            let statuses: Vec<SeaDeliveryStatus> =
                statuses.into_iter().map(Into::into).collect();
            query = query.filter(webhook_delivery::Column::Status.is_in(statuses));
        }
        if let Some(event) = params.event {
            query = query.filter(webhook_delivery::Column::Event.eq(event.to_string()));
        }
        if let Some(after) = params.created_after {
            query = query.filter(webhook_delivery::Column::CreatedAt.gte(after));
        }
        if let Some(before) = params.created_before {
            query = query.filter(webhook_delivery::Column::CreatedAt.lte(before));
        }

        let total = query.clone().count(self.db.as_ref()).await?;

        let models = query
            .order_by_desc(webhook_delivery::Column::CreatedAt)
            .limit(params.limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        let deliveries = models
            .into_iter()
            .map(WebhookDelivery::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((deliveries, total))
    }
}

impl TryFrom<webhook_delivery::Model> for WebhookDelivery {
    type Error = RepositoryError;

    fn try_from(model: webhook_delivery::Model) -> Result<Self, Self::Error> {
        let event = model.event.parse().map_err(|_| {
            RepositoryError::Database(DbErr::Custom(format!(
                "unknown event type in delivery row: {}",
                model.event
            )))
        })?;

        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            webhook_id: model.webhook_id,
            webhook_url: model.webhook_url,
            event,
            payload: model.payload,
            status: model.status.into(),
            attempt_number: model.attempt_number,
            max_attempts: model.max_attempts,
            response_status: model.response_status,
            response_body: model.response_body,
            response_headers: model.response_headers,
            error_message: model.error_message,
            duration_ms: model.duration_ms,
            next_retry_at: model.next_retry_at.map(Into::into),
            delivered_at: model.delivered_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}
