// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::delivery_repo_impl::DeliveryRepoImpl;
use crate::infrastructure::repositories::webhook_repo_impl::WebhookRepoImpl;
use crate::infrastructure::services::http_transport::HttpTransport;
use crate::presentation::handlers::{delivery_handler, dispatch_handler, webhook_handler};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// 仓库与用例实例由main通过Extension层注入
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/webhooks",
            post(webhook_handler::create_webhook::<WebhookRepoImpl>)
                .get(webhook_handler::list_webhooks::<WebhookRepoImpl>),
        )
        .route(
            "/v1/webhooks/{id}",
            get(webhook_handler::get_webhook::<WebhookRepoImpl>)
                .patch(webhook_handler::update_webhook::<WebhookRepoImpl>)
                .delete(webhook_handler::delete_webhook::<WebhookRepoImpl>),
        )
        .route(
            "/v1/webhooks/{id}/test",
            post(webhook_handler::test_webhook::<WebhookRepoImpl, HttpTransport>),
        )
        .route(
            "/v1/webhooks/{id}/deliveries",
            get(delivery_handler::list_webhook_deliveries::<DeliveryRepoImpl>),
        )
        .route(
            "/v1/deliveries",
            get(delivery_handler::list_deliveries::<DeliveryRepoImpl>),
        )
        .route(
            "/v1/dispatch",
            post(
                dispatch_handler::dispatch_event::<
                    WebhookRepoImpl,
                    DeliveryRepoImpl,
                    HttpTransport,
                >,
            ),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
