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

use axum::Extension;
use hookrs::config::settings::Settings;
use hookrs::domain::services::delivery_executor::DeliveryExecutor;
use hookrs::domain::use_cases::dispatch_event::DispatchEventUseCase;
use hookrs::domain::use_cases::test_webhook::TestWebhookUseCase;
use hookrs::infrastructure::database::connection;
use hookrs::infrastructure::repositories::delivery_repo_impl::DeliveryRepoImpl;
use hookrs::infrastructure::repositories::webhook_repo_impl::WebhookRepoImpl;
use hookrs::infrastructure::services::http_transport::HttpTransport;
use hookrs::presentation::routes;
use hookrs::utils::telemetry;
use hookrs::workers::manager::WorkerManager;
use hookrs::workers::retry_worker::RetryWorker;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting hookrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    hookrs::infrastructure::metrics::init_metrics(settings.server.metrics_port);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Components
    let webhook_repo = Arc::new(WebhookRepoImpl::new(db.clone()));
    let delivery_repo = Arc::new(DeliveryRepoImpl::new(db.clone()));
    let transport = Arc::new(HttpTransport::new());
    let executor = Arc::new(DeliveryExecutor::new(
        transport.clone(),
        settings.webhook.user_agent.clone(),
    ));

    let dispatch_use_case = Arc::new(DispatchEventUseCase::new(
        webhook_repo.clone(),
        delivery_repo.clone(),
        executor.clone(),
        settings.webhook.dispatch_concurrency,
    ));
    let test_use_case = Arc::new(TestWebhookUseCase::new(
        webhook_repo.clone(),
        executor.clone(),
    ));

    // 5. Start Workers
    let retry_worker = Arc::new(RetryWorker::new(
        webhook_repo.clone(),
        delivery_repo.clone(),
        executor.clone(),
        Duration::from_secs(settings.webhook.retry_interval_secs),
        settings.webhook.retry_batch_size,
        settings.webhook.retry_concurrency,
    ));
    let mut worker_manager = WorkerManager::new();
    worker_manager.start_retry_worker(retry_worker);
    info!("Retry worker started");

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(webhook_repo))
        .layer(Extension(delivery_repo))
        .layer(Extension(dispatch_use_case))
        .layer(Extension(test_use_case))
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            worker_manager.wait_for_shutdown().await;
        })
        .await?;

    Ok(())
}
