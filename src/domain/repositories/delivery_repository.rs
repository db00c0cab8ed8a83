// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::webhook_repository::RepositoryError;
use crate::domain::models::delivery::{DeliveryStatus, WebhookDelivery};
use crate::domain::models::event::WebhookEventType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 投递记录查询参数
#[derive(Debug, Default, Clone)]
pub struct DeliveryQueryParams {
    pub tenant_id: Uuid,
    pub webhook_id: Option<Uuid>,
    pub statuses: Option<Vec<DeliveryStatus>>,
    pub event: Option<WebhookEventType>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: u64,
    pub offset: u64,
}

/// 投递记录仓库特质
///
/// 定义投递台账的数据访问接口。记录只创建和更新，
/// 永不删除，构成仅追加的审计轨迹。
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// 创建投递记录
    async fn create(&self, delivery: &WebhookDelivery)
        -> Result<WebhookDelivery, RepositoryError>;
    /// 在租户范围内根据ID查找投递记录
    async fn find_by_id(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<WebhookDelivery>, RepositoryError>;
    /// 查找到期应重试的投递，按到期时间从早到晚排序
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<WebhookDelivery>, RepositoryError>;
    /// 更新投递记录
    async fn update(&self, delivery: &WebhookDelivery)
        -> Result<WebhookDelivery, RepositoryError>;
    /// 分页查询投递记录
    async fn list(
        &self,
        params: DeliveryQueryParams,
    ) -> Result<(Vec<WebhookDelivery>, u64), RepositoryError>;
}
