// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::event::WebhookEventType;
use crate::domain::models::webhook::WebhookConfig;
use crate::utils::retry_policy::RetryPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 投递状态枚举
///
/// 表示一次投递在其生命周期中的状态。状态转换如下：
/// Pending → Success/Retrying/Failed；Retrying → Success/Retrying/Failed。
/// Success与Failed为终态；Pending仅存在于首次尝试完成之前，
/// 不会作为持久的停留状态出现。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// 待处理，投递已创建但首次尝试尚未完成
    #[default]
    Pending,
    /// 投递成功，终态
    Success,
    /// 等待下次重试的持久停留状态
    Retrying,
    /// 投递失败，尝试耗尽或订阅已失效，终态
    Failed,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Success => write!(f, "success"),
            DeliveryStatus::Retrying => write!(f, "retrying"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeliveryStatus::Pending),
            "success" => Ok(DeliveryStatus::Success),
            "retrying" => Ok(DeliveryStatus::Retrying),
            "failed" => Ok(DeliveryStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 单次投递尝试的结果
///
/// 由投递执行器产出，调用方据此推进状态机并持久化。
#[derive(Debug, Clone, Default)]
pub struct AttemptResult {
    /// 是否成功（HTTP状态码在[200, 300)区间内）
    pub success: bool,
    /// HTTP响应状态码
    pub status_code: Option<u16>,
    /// 响应体（已截断）
    pub response_body: Option<String>,
    /// 响应头
    pub response_headers: Option<JsonValue>,
    /// 错误信息，网络错误或超时时填写
    pub error: Option<String>,
    /// 本次尝试耗时（毫秒）
    pub duration_ms: u64,
}

/// Webhook投递实体
///
/// 每个（配置，事件发生）对产生一行投递记录，在重试生命周期中
/// 被更新，但永不删除，构成仅追加的审计轨迹。URL与最大尝试次数
/// 在分发时刻冻结，之后的配置变更不影响在途投递。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookDelivery {
    /// 投递唯一标识符
    pub id: Uuid,
    /// 所属租户ID
    pub tenant_id: Uuid,
    /// 关联的Webhook配置ID
    pub webhook_id: Uuid,
    /// 分发时刻冻结的回调URL
    pub webhook_url: String,
    /// 事件类型
    pub event: WebhookEventType,
    /// 冻结的事件信封，各次重试原样复用
    pub payload: JsonValue,
    /// 投递状态
    pub status: DeliveryStatus,
    /// 已完成的尝试次数
    pub attempt_number: i32,
    /// 最大尝试次数，分发时刻从配置拷贝
    pub max_attempts: i32,
    /// 最后一次尝试的HTTP响应状态码
    pub response_status: Option<i32>,
    /// 最后一次尝试的响应体（已截断）
    pub response_body: Option<String>,
    /// 最后一次尝试的响应头
    pub response_headers: Option<JsonValue>,
    /// 最后一次尝试的错误信息
    pub error_message: Option<String>,
    /// 最后一次尝试耗时（毫秒）
    pub duration_ms: Option<i64>,
    /// 下次重试时间，仅在Retrying状态下非空
    pub next_retry_at: Option<DateTime<Utc>>,
    /// 投递成功时间，仅在Success状态下非空
    pub delivered_at: Option<DateTime<Utc>>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl WebhookDelivery {
    /// 在首次尝试前创建投递记录
    ///
    /// # 参数
    ///
    /// * `config` - 匹配的Webhook配置，URL与重试上限从此冻结
    /// * `event` - 事件类型
    /// * `payload` - 已构建的事件信封
    pub fn new(config: &WebhookConfig, event: WebhookEventType, payload: JsonValue) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id: config.tenant_id,
            webhook_id: config.id,
            webhook_url: config.url.clone(),
            event,
            payload,
            status: DeliveryStatus::Pending,
            attempt_number: 0,
            max_attempts: config.retry_count,
            response_status: None,
            response_body: None,
            response_headers: None,
            error_message: None,
            duration_ms: None,
            next_retry_at: None,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 应用一次尝试的结果并推进状态机
    ///
    /// 成功则进入Success终态；失败时若尝试未耗尽则进入Retrying
    /// 并按指数退避排期下次重试，否则进入Failed终态。
    ///
    /// # 参数
    ///
    /// * `result` - 本次尝试的结果
    /// * `policy` - 重试退避策略
    pub fn apply_attempt(&mut self, result: &AttemptResult, policy: &RetryPolicy) {
        let now = Utc::now();

        self.attempt_number += 1;
        self.response_status = result.status_code.map(i32::from);
        self.response_body = result.response_body.clone();
        self.response_headers = result.response_headers.clone();
        self.error_message = result.error.clone();
        self.duration_ms = Some(result.duration_ms as i64);
        self.updated_at = now;

        if result.success {
            self.status = DeliveryStatus::Success;
            self.delivered_at = Some(now);
            self.next_retry_at = None;
        } else if policy.should_retry(self.attempt_number, self.max_attempts) {
            self.status = DeliveryStatus::Retrying;
            self.next_retry_at = Some(policy.next_retry_time(self.attempt_number, now));
        } else {
            self.status = DeliveryStatus::Failed;
            self.next_retry_at = None;
        }
    }

    /// 订阅已停用或删除时将投递置为失败终态
    ///
    /// 不消耗HTTP尝试次数
    pub fn mark_webhook_inactive(&mut self) {
        self.status = DeliveryStatus::Failed;
        self.error_message = Some("webhook no longer active".to_string());
        self.next_retry_at = None;
        self.updated_at = Utc::now();
    }

    /// 投递是否处于终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            DeliveryStatus::Success | DeliveryStatus::Failed
        )
    }
}
