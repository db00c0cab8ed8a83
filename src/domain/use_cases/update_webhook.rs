// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookConfig;
use crate::domain::repositories::webhook_repository::{RepositoryError, WebhookRepository};
use crate::utils::validators;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 更新Webhook配置的输入，未提供的字段保持不变
#[derive(Debug, Clone, Default)]
pub struct UpdateWebhookInput {
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
    pub secret: Option<String>,
    pub retry_count: Option<i32>,
    pub timeout_ms: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub is_active: Option<bool>,
}

pub struct UpdateWebhookUseCase<R: WebhookRepository> {
    repo: Arc<R>,
}

impl<R: WebhookRepository> UpdateWebhookUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 校验并更新既有Webhook配置
    ///
    /// 已软删除的配置视为不存在。配置变更不影响在途投递，
    /// 其URL与重试上限在分发时刻已冻结。
    pub async fn execute(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        input: UpdateWebhookInput,
    ) -> anyhow::Result<WebhookConfig> {
        let mut config = self
            .repo
            .find_by_id(id, tenant_id)
            .await?
            .filter(|c| c.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(url) = input.url {
            validators::validate_webhook_url(&url)?;
            config.url = url;
        }
        if let Some(events) = input.events {
            config.events = validators::validate_events(&events)?;
        }
        if let Some(secret) = input.secret {
            validators::validate_secret(&secret)?;
            config.secret = secret;
        }
        if let Some(retry_count) = input.retry_count {
            config.retry_count = retry_count;
        }
        if let Some(timeout_ms) = input.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(headers) = input.headers {
            config.headers = headers;
        }
        if let Some(is_active) = input.is_active {
            config.is_active = is_active;
        }
        config.updated_at = Utc::now();

        self.repo.update(&config).await?;
        Ok(config)
    }
}
