// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::event::WebhookEventType;
use crate::domain::models::payload::{DispatchOptions, WebhookPayload};
use crate::domain::repositories::webhook_repository::{RepositoryError, WebhookRepository};
use crate::domain::services::delivery_executor::{DeliveryExecutor, DeliveryTarget};
use crate::domain::services::transport::WebhookTransport;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// 测试投递的结果
#[derive(Debug, Clone, Serialize)]
pub struct WebhookTestOutcome {
    pub success: bool,
    pub status_code: Option<u16>,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

/// Webhook测试用例
///
/// 通过常规投递执行器发送一次合成样例事件，
/// 绕过台账与重试排期，供运维验证端点连通性。
pub struct TestWebhookUseCase<W, T>
where
    W: WebhookRepository,
    T: WebhookTransport,
{
    webhook_repo: Arc<W>,
    executor: Arc<DeliveryExecutor<T>>,
}

impl<W, T> TestWebhookUseCase<W, T>
where
    W: WebhookRepository,
    T: WebhookTransport,
{
    pub fn new(webhook_repo: Arc<W>, executor: Arc<DeliveryExecutor<T>>) -> Self {
        Self {
            webhook_repo,
            executor,
        }
    }

    /// 对指定配置执行单次测试投递
    ///
    /// # 参数
    ///
    /// * `id` - Webhook配置ID
    /// * `tenant_id` - 租户ID
    ///
    /// # 返回值
    ///
    /// * `Ok(WebhookTestOutcome)` - 本次尝试的结果，失败同样以数据返回
    /// * `Err(RepositoryError::NotFound)` - 配置不存在或已删除
    pub async fn execute(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<WebhookTestOutcome, RepositoryError> {
        let config = self
            .webhook_repo
            .find_by_id(id, tenant_id)
            .await?
            .filter(|c| c.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound)?;

        let payload = WebhookPayload::build(
            tenant_id,
            WebhookEventType::WebhookTest,
            DispatchOptions {
                entity_type: "webhook".to_string(),
                entity_id: config.id.to_string(),
                action: "test".to_string(),
                current: serde_json::json!({
                    "webhook_id": config.id,
                    "url": config.url,
                }),
                ..Default::default()
            },
        );
        let envelope = match serde_json::to_value(&payload) {
            Ok(value) => value,
            Err(e) => {
                return Ok(WebhookTestOutcome {
                    success: false,
                    status_code: None,
                    response_time_ms: 0,
                    error: Some(format!("failed to serialize payload: {}", e)),
                })
            }
        };

        let target = DeliveryTarget {
            url: &config.url,
            secret: &config.secret,
            timeout_ms: config.timeout_ms,
            headers: &config.headers,
        };
        let result = self
            .executor
            .attempt(&target, WebhookEventType::WebhookTest, &envelope)
            .await;

        Ok(WebhookTestOutcome {
            success: result.success,
            status_code: result.status_code,
            response_time_ms: result.duration_ms,
            error: result.error,
        })
    }
}
