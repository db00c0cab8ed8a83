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

use crate::domain::models::delivery::WebhookDelivery;
use crate::domain::repositories::delivery_repository::DeliveryRepository;
use crate::domain::repositories::webhook_repository::WebhookRepository;
use crate::domain::services::delivery_executor::{DeliveryExecutor, DeliveryTarget};
use crate::domain::services::transport::WebhookTransport;
use crate::utils::retry_policy::RetryPolicy;
use chrono::Utc;
use futures::StreamExt;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// 重试工作器
///
/// 周期性扫描台账中到期应重试的投递并重新执行。重试计划
/// 完整地保存在台账中，进程重启不丢失任何排期；单条投递
/// 的处理失败被隔离，不影响同批次的其他投递。
pub struct RetryWorker<W, D, T>
where
    W: WebhookRepository,
    D: DeliveryRepository,
    T: WebhookTransport,
{
    /// 配置仓库
    webhook_repo: Arc<W>,
    /// 投递台账仓库
    delivery_repo: Arc<D>,
    /// 投递执行器
    executor: Arc<DeliveryExecutor<T>>,
    /// 重试退避策略
    retry_policy: RetryPolicy,
    /// 轮询间隔
    poll_interval: Duration,
    /// 每轮批次大小
    batch_size: u64,
    /// 批次内并发数
    concurrency: usize,
}

impl<W, D, T> RetryWorker<W, D, T>
where
    W: WebhookRepository,
    D: DeliveryRepository,
    T: WebhookTransport,
{
    /// 创建新的重试工作器实例
    ///
    /// # 参数
    ///
    /// * `webhook_repo` - 配置仓库
    /// * `delivery_repo` - 投递台账仓库
    /// * `executor` - 投递执行器
    /// * `poll_interval` - 轮询间隔
    /// * `batch_size` - 每轮批次大小
    /// * `concurrency` - 批次内并发数
    pub fn new(
        webhook_repo: Arc<W>,
        delivery_repo: Arc<D>,
        executor: Arc<DeliveryExecutor<T>>,
        poll_interval: Duration,
        batch_size: u64,
        concurrency: usize,
    ) -> Self {
        Self {
            webhook_repo,
            delivery_repo,
            executor,
            retry_policy: RetryPolicy::default(),
            poll_interval,
            batch_size,
            concurrency,
        }
    }

    /// 运行重试工作器
    ///
    /// 启动重试处理循环，按固定间隔处理到期的投递
    pub async fn run(&self) {
        info!("Retry worker started");
        loop {
            if let Err(e) = self.process_due_retries().await {
                error!("Error processing webhook retries: {}", e);
            }
            sleep(self.poll_interval).await;
        }
    }

    /// 处理一批到期的投递
    ///
    /// 从台账中按到期时间从早到晚取出一批投递并重新执行
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 本轮处理完成
    /// * `Err(anyhow::Error)` - 到期查询失败
    pub async fn process_due_retries(&self) -> anyhow::Result<()> {
        let due = self
            .delivery_repo
            .find_due(Utc::now(), self.batch_size)
            .await?;

        if due.is_empty() {
            return Ok(());
        }

        info!("Processing {} due webhook deliveries", due.len());

        // Process in parallel with bounded concurrency; failures stay per-delivery
        let worker = self;
        futures::stream::iter(due)
            .for_each_concurrent(self.concurrency, |delivery| {
                let w = worker;
                async move {
                    let delivery_id = delivery.id;
                    if let Err(e) = w.process_delivery(delivery).await {
                        error!("Failed to process delivery {}: {}", delivery_id, e);
                    }
                }
            })
            .await;

        Ok(())
    }

    /// 重新执行单条投递
    ///
    /// 先确认所属配置仍然启用；停用或已删除的配置使投递直接
    /// 进入失败终态，不消耗HTTP尝试。执行时复用投递记录上
    /// 冻结的URL与信封，密钥与超时取自当前配置。
    async fn process_delivery(&self, mut delivery: WebhookDelivery) -> anyhow::Result<()> {
        let config = self
            .webhook_repo
            .find_by_id(delivery.webhook_id, delivery.tenant_id)
            .await?;

        let config = match config.filter(|c| c.is_deliverable()) {
            Some(config) => config,
            None => {
                info!(
                    "Webhook {} inactive or deleted, failing delivery {}",
                    delivery.webhook_id, delivery.id
                );
                delivery.mark_webhook_inactive();
                self.delivery_repo.update(&delivery).await?;
                counter!("webhook_retry_orphaned_total").increment(1);
                return Ok(());
            }
        };

        let target = DeliveryTarget {
            url: &delivery.webhook_url,
            secret: &config.secret,
            timeout_ms: config.timeout_ms,
            headers: &config.headers,
        };
        let result = self
            .executor
            .attempt(&target, delivery.event, &delivery.payload)
            .await;

        delivery.apply_attempt(&result, &self.retry_policy);

        if delivery.is_terminal() && !result.success {
            info!(
                "Delivery {} exhausted after {} attempts",
                delivery.id, delivery.attempt_number
            );
            counter!("webhook_retry_exhausted_total").increment(1);
        }

        self.delivery_repo.update(&delivery).await?;
        Ok(())
    }
}
