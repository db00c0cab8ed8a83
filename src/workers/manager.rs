// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::repositories::delivery_repository::DeliveryRepository;
use crate::domain::repositories::webhook_repository::WebhookRepository;
use crate::domain::services::transport::WebhookTransport;
use crate::workers::retry_worker::RetryWorker;

/// 工作管理器
///
/// 管理后台工作器的启动与优雅关闭
#[derive(Default)]
pub struct WorkerManager {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// 启动重试工作器
    ///
    /// 将工作器循环派生到独立任务中，避免阻塞主线程
    ///
    /// # 参数
    ///
    /// * `worker` - 重试工作器
    pub fn start_retry_worker<W, D, T>(&mut self, worker: Arc<RetryWorker<W, D, T>>)
    where
        W: WebhookRepository + 'static,
        D: DeliveryRepository + 'static,
        T: WebhookTransport + 'static,
    {
        let handle = tokio::spawn(async move {
            worker.run().await;
        });
        self.handles.push(handle);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}
