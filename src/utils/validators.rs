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

use crate::domain::models::event::WebhookEventType;
use thiserror::Error;
use url::Url;

/// 密钥最小长度
pub const MIN_SECRET_LENGTH: usize = 16;

/// 验证错误类型
#[derive(Error, Debug)]
pub enum ValidationError {
    /// URL无效
    #[error("invalid webhook URL: {0}")]
    InvalidUrl(String),
    /// URL协议不受支持
    #[error("invalid webhook URL scheme '{0}': only http and https are allowed")]
    UnsupportedScheme(String),
    /// 事件集合为空
    #[error("events cannot be empty")]
    EmptyEvents,
    /// 未知事件类型
    #[error("unknown event type: {0}")]
    UnknownEvent(String),
    /// 查询过滤条件无效
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    /// 密钥太短
    #[error("secret must be at least {MIN_SECRET_LENGTH} characters")]
    WeakSecret,
}

/// 验证Webhook回调URL
///
/// 仅做同步的格式与协议检查，不做网络解析
///
/// # 参数
///
/// * `url` - URL字符串
///
/// # 返回值
///
/// * `Ok(())` - URL有效
/// * `Err(ValidationError)` - URL无效或协议不受支持
pub fn validate_webhook_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    // Check scheme
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ValidationError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl("missing host".to_string()));
    }

    Ok(())
}

/// 验证并解析订阅事件集合
///
/// 拒绝空集合与闭集之外的事件标识
///
/// # 参数
///
/// * `events` - 事件标识字符串列表
///
/// # 返回值
///
/// * `Ok(Vec<WebhookEventType>)` - 解析后的事件类型集合
/// * `Err(ValidationError)` - 集合为空或包含未知事件
pub fn validate_events(events: &[String]) -> Result<Vec<WebhookEventType>, ValidationError> {
    if events.is_empty() {
        return Err(ValidationError::EmptyEvents);
    }

    events
        .iter()
        .map(|e| {
            e.parse::<WebhookEventType>()
                .map_err(|_| ValidationError::UnknownEvent(e.clone()))
        })
        .collect()
}

/// 验证签名密钥强度
///
/// # 参数
///
/// * `secret` - 共享签名密钥
pub fn validate_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ValidationError::WeakSecret);
    }
    Ok(())
}
