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

use crate::domain::models::payload::DispatchOptions;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// 事件分发请求数据传输对象
///
/// 由领域动作完成后的调用方提交，触发对订阅方的扇出投递
#[derive(Debug, Deserialize)]
pub struct DispatchRequestDto {
    /// 租户ID
    pub tenant_id: Uuid,
    /// 事件标识
    pub event: String,
    /// 实体类型
    pub entity_type: String,
    /// 实体ID
    pub entity_id: String,
    /// 触发的动作
    pub action: String,
    /// 实体当前快照
    pub current: Value,
    /// 变更前快照
    pub previous: Option<Value>,
    /// 字段级变更集
    pub changes: Option<Value>,
    /// 触发请求的ID
    pub request_id: Option<String>,
    /// 触发者ID
    pub actor_id: Option<String>,
    /// 触发者邮箱
    pub actor_email: Option<String>,
}

impl From<DispatchRequestDto> for DispatchOptions {
    fn from(dto: DispatchRequestDto) -> Self {
        Self {
            entity_type: dto.entity_type,
            entity_id: dto.entity_id,
            action: dto.action,
            current: dto.current,
            previous: dto.previous,
            changes: dto.changes,
            request_id: dto.request_id,
            actor_id: dto.actor_id,
            actor_email: dto.actor_email,
        }
    }
}
