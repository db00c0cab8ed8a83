// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::event::WebhookEventType;
use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// 负载来源标识
const PAYLOAD_SOURCE: &str = "crm";

/// 负载格式版本
const PAYLOAD_VERSION: &str = "1.0";

/// Webhook负载信封
///
/// 发送到接收端的不可变事件信封。每次分发只构建一次，
/// 同一投递的所有重试均原样复用，保证签名在各次尝试间稳定。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// 全局唯一的投递/事件标识，接收端可据此去重
    pub id: String,
    /// 事件类型
    pub event: WebhookEventType,
    /// 信封创建时间（ISO-8601）
    pub timestamp: DateTime<Utc>,
    /// 所属租户ID
    pub tenant_id: Uuid,
    /// 事件数据
    pub data: EventData,
    /// 事件元信息
    pub metadata: PayloadMetadata,
}

/// 事件数据部分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    /// 实体类型，如 "lead"、"opportunity"
    pub entity_type: String,
    /// 实体ID
    pub entity_id: String,
    /// 触发的动作，如 "created"、"won"
    pub action: String,
    /// 实体当前快照
    pub current: JsonValue,
    /// 变更前快照
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<JsonValue>,
    /// 字段级变更集
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<JsonValue>,
}

/// 事件元信息部分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadMetadata {
    /// 触发请求的ID，用于链路追踪
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// 触发者ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    /// 触发者邮箱
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_email: Option<String>,
    /// 负载来源标识
    pub source: String,
    /// 负载格式版本
    pub version: String,
}

/// 分发选项
///
/// 由触发领域动作的调用方提供的事件内容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchOptions {
    /// 实体类型
    pub entity_type: String,
    /// 实体ID
    pub entity_id: String,
    /// 触发的动作
    pub action: String,
    /// 实体当前快照
    pub current: JsonValue,
    /// 变更前快照
    pub previous: Option<JsonValue>,
    /// 字段级变更集
    pub changes: Option<JsonValue>,
    /// 触发请求的ID
    pub request_id: Option<String>,
    /// 触发者ID
    pub actor_id: Option<String>,
    /// 触发者邮箱
    pub actor_email: Option<String>,
}

impl WebhookPayload {
    /// 构建事件信封
    ///
    /// 信封ID在此一次性生成，在投递的整个生命周期内保持不变
    ///
    /// # 参数
    ///
    /// * `tenant_id` - 所属租户ID
    /// * `event` - 事件类型
    /// * `options` - 分发选项
    pub fn build(tenant_id: Uuid, event: WebhookEventType, options: DispatchOptions) -> Self {
        Self {
            id: generate_payload_id(),
            event,
            timestamp: Utc::now(),
            tenant_id,
            data: EventData {
                entity_type: options.entity_type,
                entity_id: options.entity_id,
                action: options.action,
                current: options.current,
                previous: options.previous,
                changes: options.changes,
            },
            metadata: PayloadMetadata {
                request_id: options.request_id,
                actor_id: options.actor_id,
                actor_email: options.actor_email,
                source: PAYLOAD_SOURCE.to_string(),
                version: PAYLOAD_VERSION.to_string(),
            },
        }
    }
}

/// 生成负载标识
///
/// 时间戳前缀加随机后缀。随机部分仅用于唯一性提示，
/// 不具备抗猜测性，接收端不应将其用于重放防护。
fn generate_payload_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("evt_{}_{}", Utc::now().timestamp_millis(), suffix)
}
