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

use crate::domain::models::webhook::WebhookConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 创建Webhook请求数据传输对象
#[derive(Debug, Deserialize)]
pub struct CreateWebhookDto {
    /// 所属租户ID
    pub tenant_id: Uuid,
    /// Webhook回调URL
    pub url: String,
    /// 订阅的事件标识列表
    pub events: Vec<String>,
    /// 共享签名密钥
    pub secret: String,
    /// 最大投递尝试次数
    pub retry_count: Option<i32>,
    /// 单次尝试超时时间（毫秒）
    pub timeout_ms: Option<u64>,
    /// 自定义HTTP请求头
    pub headers: Option<HashMap<String, String>>,
    /// 是否启用
    pub is_active: Option<bool>,
}

/// 更新Webhook请求数据传输对象，未提供的字段保持不变
#[derive(Debug, Deserialize)]
pub struct UpdateWebhookDto {
    /// 所属租户ID
    pub tenant_id: Uuid,
    /// Webhook回调URL
    pub url: Option<String>,
    /// 订阅的事件标识列表
    pub events: Option<Vec<String>>,
    /// 共享签名密钥
    pub secret: Option<String>,
    /// 最大投递尝试次数
    pub retry_count: Option<i32>,
    /// 单次尝试超时时间（毫秒）
    pub timeout_ms: Option<u64>,
    /// 自定义HTTP请求头
    pub headers: Option<HashMap<String, String>>,
    /// 是否启用
    pub is_active: Option<bool>,
}

/// 租户范围查询参数
#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    /// 租户ID
    pub tenant_id: Uuid,
}

/// Webhook列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListWebhooksQuery {
    /// 租户ID
    pub tenant_id: Uuid,
    /// 按启用状态过滤
    pub is_active: Option<bool>,
    /// 分页大小
    pub limit: Option<u64>,
    /// 分页偏移
    pub offset: Option<u64>,
}

/// Webhook列表响应数据传输对象
#[derive(Debug, Serialize)]
pub struct WebhookListResponseDto {
    /// 当前页配置列表
    pub webhooks: Vec<WebhookConfig>,
    /// 符合条件的总数
    pub total: u64,
    /// 分页大小
    pub limit: u64,
    /// 分页偏移
    pub offset: u64,
}
