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

use crate::domain::models::delivery::AttemptResult;
use crate::domain::models::event::WebhookEventType;
use crate::domain::services::transport::{TransportError, TransportRequest, WebhookTransport};
use crate::utils::signature::sign_payload;
use metrics::{counter, histogram};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// 持久化前响应体的最大字节数
pub const RESPONSE_BODY_LIMIT: usize = 10_000;

/// 单次投递尝试的目标参数
///
/// 首次尝试来自配置；重试时URL使用投递记录上冻结的值，
/// 密钥、超时与自定义头来自当前配置。
#[derive(Debug)]
pub struct DeliveryTarget<'a> {
    /// 目标URL
    pub url: &'a str,
    /// 共享签名密钥
    pub secret: &'a str,
    /// 单次尝试超时时间（毫秒）
    pub timeout_ms: u64,
    /// 自定义HTTP头
    pub headers: &'a HashMap<String, String>,
}

/// 投递执行器
///
/// 对单个目标执行一次受限HTTP尝试并归类结果。
/// 执行器不触碰投递台账，结果的持久化由调用方负责，
/// 因此可以用假传输独立测试。
pub struct DeliveryExecutor<T: WebhookTransport> {
    /// 传输实现
    transport: Arc<T>,
    /// 出站请求User-Agent标识
    user_agent: String,
}

impl<T: WebhookTransport> DeliveryExecutor<T> {
    /// 创建新的投递执行器
    ///
    /// # 参数
    ///
    /// * `transport` - 传输实现
    /// * `user_agent` - 出站请求User-Agent标识
    pub fn new(transport: Arc<T>, user_agent: String) -> Self {
        Self {
            transport,
            user_agent,
        }
    }

    /// 执行一次投递尝试
    ///
    /// 对信封字节做一次序列化与签名。信封在投递生命周期内
    /// 冻结，因此每次重试产生的签名与首次尝试一致。
    ///
    /// # 参数
    ///
    /// * `target` - 目标参数
    /// * `event` - 事件类型
    /// * `payload` - 冻结的事件信封
    ///
    /// # 返回值
    ///
    /// 返回本次尝试的归类结果，从不panic，也不写台账
    pub async fn attempt(
        &self,
        target: &DeliveryTarget<'_>,
        event: WebhookEventType,
        payload: &JsonValue,
    ) -> AttemptResult {
        let body = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                return AttemptResult {
                    success: false,
                    error: Some(format!("failed to serialize payload: {}", e)),
                    ..Default::default()
                }
            }
        };

        let signature = sign_payload(&body, target.secret);
        let payload_id = payload
            .get("id")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        let timestamp = payload
            .get("timestamp")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("X-Webhook-Signature".to_string(), signature),
            ("X-Webhook-Event".to_string(), event.to_string()),
            ("X-Webhook-ID".to_string(), payload_id.to_string()),
            ("X-Webhook-Timestamp".to_string(), timestamp.to_string()),
        ];
        for (name, value) in target.headers {
            headers.push((name.clone(), value.clone()));
        }

        let request = TransportRequest {
            url: target.url.to_string(),
            headers,
            body,
            timeout: Duration::from_millis(target.timeout_ms),
        };

        counter!("webhook_delivery_attempts_total").increment(1);
        let start = std::time::Instant::now();

        let response = self.transport.send(request).await;

        let duration = start.elapsed();
        histogram!("webhook_delivery_duration_seconds").record(duration.as_secs_f64());
        let duration_ms = duration.as_millis() as u64;

        match response {
            Ok(resp) => {
                let success = (200..300).contains(&resp.status);
                if success {
                    counter!("webhook_delivery_success_total").increment(1);
                } else {
                    counter!("webhook_delivery_failed_total", "reason" => "http_error")
                        .increment(1);
                }

                let header_map: serde_json::Map<String, JsonValue> = resp
                    .headers
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::String(v)))
                    .collect();

                AttemptResult {
                    success,
                    status_code: Some(resp.status),
                    response_body: Some(truncate_body(resp.body)),
                    response_headers: Some(JsonValue::Object(header_map)),
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                let reason = match e {
                    TransportError::TimedOut(_) => "timeout",
                    TransportError::Network(_) => "network_error",
                };
                counter!("webhook_delivery_failed_total", "reason" => reason).increment(1);

                AttemptResult {
                    success: false,
                    error: Some(e.to_string()),
                    duration_ms,
                    ..Default::default()
                }
            }
        }
    }
}

/// 按字节上限截断响应体，避免接收端异常响应撑爆存储
fn truncate_body(mut body: String) -> String {
    if body.len() <= RESPONSE_BODY_LIMIT {
        return body;
    }

    let mut limit = RESPONSE_BODY_LIMIT;
    // Back off to the nearest char boundary
    while !body.is_char_boundary(limit) {
        limit -= 1;
    }
    body.truncate(limit);
    body
}
