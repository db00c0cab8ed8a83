// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::WebhookConfig;
use crate::domain::repositories::webhook_repository::WebhookRepository;
use crate::utils::validators;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 创建Webhook配置的输入
#[derive(Debug, Clone)]
pub struct CreateWebhookInput {
    pub url: String,
    pub events: Vec<String>,
    pub secret: String,
    pub retry_count: Option<i32>,
    pub timeout_ms: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub is_active: Option<bool>,
}

pub struct CreateWebhookUseCase<R: WebhookRepository> {
    repo: Arc<R>,
}

impl<R: WebhookRepository> CreateWebhookUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 校验并持久化一个新的Webhook配置
    ///
    /// 校验失败时同步返回错误，不触达存储
    pub async fn execute(
        &self,
        tenant_id: Uuid,
        input: CreateWebhookInput,
    ) -> anyhow::Result<WebhookConfig> {
        validators::validate_webhook_url(&input.url)?;
        let events = validators::validate_events(&input.events)?;
        validators::validate_secret(&input.secret)?;

        let mut config = WebhookConfig::new(tenant_id, input.url, events, input.secret);
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

        self.repo.create(&config).await?;
        Ok(config)
    }
}
