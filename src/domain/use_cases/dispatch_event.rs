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
use crate::domain::models::event::WebhookEventType;
use crate::domain::models::payload::{DispatchOptions, WebhookPayload};
use crate::domain::models::webhook::WebhookConfig;
use crate::domain::repositories::delivery_repository::DeliveryRepository;
use crate::domain::repositories::webhook_repository::WebhookRepository;
use crate::domain::services::delivery_executor::{DeliveryExecutor, DeliveryTarget};
use crate::domain::services::transport::WebhookTransport;
use crate::utils::retry_policy::RetryPolicy;
use futures::StreamExt;
use metrics::counter;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// 单个订阅方的分发结果
///
/// 投递失败是数据而非异常，分发调用方据此观察各目标的
/// 首次尝试结果。
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    /// 目标Webhook配置ID
    pub webhook_id: Uuid,
    /// 创建的投递记录ID
    pub delivery_id: Uuid,
    /// 首次尝试后的投递状态
    pub status: DeliveryStatus,
    /// 首次尝试是否成功
    pub success: bool,
    /// 首次尝试的错误信息
    pub error: Option<String>,
}

/// 事件分发用例
///
/// 领域动作完成后的扇出编排器：查找订阅方、构建一份共享
/// 信封、对每个订阅方并发执行首次投递尝试并落台账。
pub struct DispatchEventUseCase<W, D, T>
where
    W: WebhookRepository,
    D: DeliveryRepository,
    T: WebhookTransport,
{
    webhook_repo: Arc<W>,
    delivery_repo: Arc<D>,
    executor: Arc<DeliveryExecutor<T>>,
    retry_policy: RetryPolicy,
    concurrency: usize,
}

impl<W, D, T> DispatchEventUseCase<W, D, T>
where
    W: WebhookRepository,
    D: DeliveryRepository,
    T: WebhookTransport,
{
    pub fn new(
        webhook_repo: Arc<W>,
        delivery_repo: Arc<D>,
        executor: Arc<DeliveryExecutor<T>>,
        concurrency: usize,
    ) -> Self {
        Self {
            webhook_repo,
            delivery_repo,
            executor,
            retry_policy: RetryPolicy::default(),
            concurrency,
        }
    }

    /// 向所有订阅了该事件的启用配置分发一次事件
    ///
    /// 无订阅方时返回空列表，不视为错误。单个目标的投递失败
    /// 不影响其他目标，也不会作为异常向上传播；仅当订阅查询
    /// 本身失败时返回错误。
    ///
    /// # 参数
    ///
    /// * `tenant_id` - 租户ID
    /// * `event` - 事件类型
    /// * `options` - 事件内容与元信息
    ///
    /// # 返回值
    ///
    /// 每个匹配配置一个`DispatchResult`
    pub async fn execute(
        &self,
        tenant_id: Uuid,
        event: WebhookEventType,
        options: DispatchOptions,
    ) -> anyhow::Result<Vec<DispatchResult>> {
        let configs = self.webhook_repo.find_active(tenant_id, event).await?;
        if configs.is_empty() {
            return Ok(Vec::new());
        }

        // One envelope per event occurrence, shared by every subscriber
        let payload = WebhookPayload::build(tenant_id, event, options);
        let envelope = serde_json::to_value(&payload)?;

        counter!("webhook_dispatch_total").increment(1);
        info!(
            "Dispatching {} to {} subscriber(s) for tenant {}",
            event,
            configs.len(),
            tenant_id
        );

        let results = futures::stream::iter(configs)
            .map(|config| self.dispatch_one(config, event, &envelope))
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(results)
    }

    /// 对单个订阅方执行首次投递尝试
    ///
    /// 每个匹配配置恰好写入一行投递记录
    async fn dispatch_one(
        &self,
        config: WebhookConfig,
        event: WebhookEventType,
        envelope: &JsonValue,
    ) -> DispatchResult {
        let mut delivery = WebhookDelivery::new(&config, event, envelope.clone());

        if let Err(e) = self.delivery_repo.create(&delivery).await {
            error!(
                "Failed to create delivery record for webhook {}: {}",
                config.id, e
            );
            return DispatchResult {
                webhook_id: config.id,
                delivery_id: delivery.id,
                status: DeliveryStatus::Failed,
                success: false,
                error: Some(e.to_string()),
            };
        }

        let target = DeliveryTarget {
            url: &config.url,
            secret: &config.secret,
            timeout_ms: config.timeout_ms,
            headers: &config.headers,
        };
        let result = self.executor.attempt(&target, event, &delivery.payload).await;

        delivery.apply_attempt(&result, &self.retry_policy);

        if let Err(e) = self.delivery_repo.update(&delivery).await {
            error!("Failed to persist delivery outcome {}: {}", delivery.id, e);
        }

        DispatchResult {
            webhook_id: config.id,
            delivery_id: delivery.id,
            status: delivery.status,
            success: result.success,
            error: delivery.error_message.clone(),
        }
    }
}
