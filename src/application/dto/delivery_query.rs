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

use crate::domain::models::delivery::WebhookDelivery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 投递日志查询数据传输对象
#[derive(Debug, Deserialize, Validate)]
pub struct DeliveryQueryDto {
    /// 租户ID
    pub tenant_id: Uuid,
    /// 按配置过滤
    pub webhook_id: Option<Uuid>,
    /// 按状态过滤
    pub status: Option<String>,
    /// 按事件过滤
    pub event: Option<String>,
    /// 创建时间下界
    pub created_after: Option<DateTime<Utc>>,
    /// 创建时间上界
    pub created_before: Option<DateTime<Utc>>,
    /// 分页大小
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// 分页偏移
    pub offset: Option<u64>,
}

/// 投递日志响应数据传输对象
#[derive(Debug, Serialize)]
pub struct DeliveryLogResponseDto {
    /// 当前页投递记录
    pub deliveries: Vec<WebhookDelivery>,
    /// 符合条件的总数
    pub total: u64,
    /// 分页大小
    pub limit: u64,
    /// 分页偏移
    pub offset: u64,
}
