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

use crate::domain::models::event::WebhookEventType;
use crate::domain::models::webhook::WebhookConfig;
use crate::domain::repositories::webhook_repository::{
    RepositoryError, WebhookQueryParams, WebhookRepository,
};
use crate::infrastructure::database::entities::webhook;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Webhook配置仓库实现
#[derive(Clone)]
pub struct WebhookRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl WebhookRepoImpl {
    /// 创建新的Webhook配置仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn events_to_json(events: &[WebhookEventType]) -> JsonValue {
    JsonValue::Array(
        events
            .iter()
            .map(|e| JsonValue::String(e.to_string()))
            .collect(),
    )
}

fn headers_to_json(headers: &HashMap<String, String>) -> Option<JsonValue> {
    if headers.is_empty() {
        return None;
    }
    Some(JsonValue::Object(
        headers
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect(),
    ))
}

#[async_trait]
impl WebhookRepository for WebhookRepoImpl {
    async fn create(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError> {
        let active_model = webhook::ActiveModel {
            id: Set(config.id),
            tenant_id: Set(config.tenant_id),
            url: Set(config.url.clone()),
            events: Set(events_to_json(&config.events)),
            secret: Set(config.secret.clone()),
            is_active: Set(config.is_active),
            retry_count: Set(config.retry_count),
            timeout_ms: Set(config.timeout_ms as i64),
            headers: Set(headers_to_json(&config.headers)),
            created_at: Set(config.created_at.into()),
            updated_at: Set(config.updated_at.into()),
            deleted_at: Set(config.deleted_at.map(Into::into)),
        };

        webhook::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(config.clone())
    }

    async fn update(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError> {
        let mut active: webhook::ActiveModel = webhook::Entity::find_by_id(config.id)
            .filter(webhook::Column::TenantId.eq(config.tenant_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        active.url = Set(config.url.clone());
        active.events = Set(events_to_json(&config.events));
        active.secret = Set(config.secret.clone());
        active.is_active = Set(config.is_active);
        active.retry_count = Set(config.retry_count);
        active.timeout_ms = Set(config.timeout_ms as i64);
        active.headers = Set(headers_to_json(&config.headers));
        active.updated_at = Set(config.updated_at.into());
        active.deleted_at = Set(config.deleted_at.map(Into::into));

        let updated_model = active.update(self.db.as_ref()).await?;

        Ok(updated_model.into())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<WebhookConfig>, RepositoryError> {
        let model = webhook::Entity::find_by_id(id)
            .filter(webhook::Column::TenantId.eq(tenant_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_active(
        &self,
        tenant_id: Uuid,
        event: WebhookEventType,
    ) -> Result<Vec<WebhookConfig>, RepositoryError> {
        let models = webhook::Entity::find()
            .filter(webhook::Column::TenantId.eq(tenant_id))
            .filter(webhook::Column::IsActive.eq(true))
            .filter(webhook::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await?;

        // Event subscription is a JSON column; match it in Rust for portability
        let configs = models
            .into_iter()
            .map(WebhookConfig::from)
            .filter(|c| c.subscribes_to(event))
            .collect();

        Ok(configs)
    }

    async fn list(
        &self,
        params: WebhookQueryParams,
    ) -> Result<(Vec<WebhookConfig>, u64), RepositoryError> {
        let mut query = webhook::Entity::find()
            .filter(webhook::Column::TenantId.eq(params.tenant_id))
            .filter(webhook::Column::DeletedAt.is_null());

        if let Some(is_active) = params.is_active {
            query = query.filter(webhook::Column::IsActive.eq(is_active));
        }

        let total = query.clone().count(self.db.as_ref()).await?;

        let models = query
            .order_by_desc(webhook::Column::CreatedAt)
            .limit(params.limit)
            .offset(params.offset)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn soft_delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), RepositoryError> {
        let mut active: webhook::ActiveModel = webhook::Entity::find_by_id(id)
            .filter(webhook::Column::TenantId.eq(tenant_id))
            .filter(webhook::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        let now = Utc::now();
        active.deleted_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}

impl From<webhook::Model> for WebhookConfig {
    fn from(model: webhook::Model) -> Self {
        let events = model
            .events
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| s.parse().ok())
                    .collect()
            })
            .unwrap_or_default();

        let headers = model
            .headers
            .as_ref()
            .and_then(|v| v.as_object())
            .map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            url: model.url,
            events,
            secret: model.secret,
            is_active: model.is_active,
            retry_count: model.retry_count,
            timeout_ms: model.timeout_ms as u64,
            headers,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
        }
    }
}
