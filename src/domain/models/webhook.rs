// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::event::WebhookEventType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 默认最大投递尝试次数
pub const DEFAULT_RETRY_COUNT: i32 = 3;

/// 默认单次尝试超时时间（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Webhook实体
///
/// 表示一个租户级的Webhook订阅配置，用于接收CRM领域事件通知。
/// 配置决定投递目标、订阅的事件集合、签名密钥以及重试与超时参数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook唯一标识符
    pub id: Uuid,
    /// 所属租户ID，用于权限隔离和归属管理
    pub tenant_id: Uuid,
    /// Webhook回调URL，接收通知的目标地址
    pub url: String,
    /// 订阅的事件类型集合，非空
    pub events: Vec<WebhookEventType>,
    /// 共享签名密钥，创建后不再对外暴露
    #[serde(skip_serializing)]
    pub secret: String,
    /// 是否启用；停用的配置不参与分发与重试
    pub is_active: bool,
    /// 最大投递尝试次数
    pub retry_count: i32,
    /// 单次尝试超时时间（毫秒）
    pub timeout_ms: u64,
    /// 附加到出站请求的自定义HTTP头
    pub headers: HashMap<String, String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
    /// 软删除时间，删除后保留投递历史
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WebhookConfig {
    /// 创建一个新的Webhook配置
    ///
    /// 重试与超时参数使用默认值，调用方可在持久化前覆盖
    ///
    /// # 参数
    ///
    /// * `tenant_id` - 所属租户ID
    /// * `url` - Webhook回调URL
    /// * `events` - 订阅的事件类型集合
    /// * `secret` - 共享签名密钥
    ///
    /// # 返回值
    ///
    /// 返回一个新的启用状态的WebhookConfig实例
    pub fn new(
        tenant_id: Uuid,
        url: String,
        events: Vec<WebhookEventType>,
        secret: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            url,
            events,
            secret,
            is_active: true,
            retry_count: DEFAULT_RETRY_COUNT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            headers: HashMap::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// 配置是否订阅了指定事件
    pub fn subscribes_to(&self, event: WebhookEventType) -> bool {
        self.events.contains(&event)
    }

    /// 配置是否可参与分发与重试
    ///
    /// 停用或已软删除的配置不可投递
    pub fn is_deliverable(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}
