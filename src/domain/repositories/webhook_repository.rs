// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::event::WebhookEventType;
use crate::domain::models::webhook::WebhookConfig;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// Webhook配置查询参数
#[derive(Debug, Default, Clone)]
pub struct WebhookQueryParams {
    pub tenant_id: Uuid,
    pub is_active: Option<bool>,
    pub limit: u64,
    pub offset: u64,
}

/// Webhook配置仓库特质
///
/// 定义Webhook订阅配置的数据访问接口。删除为软删除，
/// 以保留投递历史的引用完整性。
#[async_trait]
pub trait WebhookRepository: Send + Sync {
    /// 创建Webhook配置
    async fn create(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError>;
    /// 更新Webhook配置
    async fn update(&self, config: &WebhookConfig) -> Result<WebhookConfig, RepositoryError>;
    /// 在租户范围内根据ID查找配置，含已软删除的配置
    async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<WebhookConfig>, RepositoryError>;
    /// 查找订阅了指定事件的启用配置
    async fn find_active(
        &self,
        tenant_id: Uuid,
        event: WebhookEventType,
    ) -> Result<Vec<WebhookConfig>, RepositoryError>;
    /// 分页查询配置，排除已软删除的配置
    async fn list(
        &self,
        params: WebhookQueryParams,
    ) -> Result<(Vec<WebhookConfig>, u64), RepositoryError>;
    /// 软删除配置
    async fn soft_delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), RepositoryError>;
}
