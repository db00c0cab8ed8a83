// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};

/// 重试策略配置
///
/// 退避曲线为 `base_delay_ms * 2^attempt`，即默认下
/// 第2、3、4次尝试前分别等待约2秒、4秒、8秒。
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 基础退避时间（毫秒）
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// 计算指定尝试次数后的退避时间（毫秒）
    ///
    /// # 参数
    ///
    /// * `attempt` - 已完成的尝试次数
    pub fn backoff_ms(&self, attempt: i32) -> u64 {
        let exp = attempt.clamp(0, 32) as u32;
        self.base_delay_ms.saturating_mul(2u64.saturating_pow(exp))
    }

    /// 计算下次重试时间
    ///
    /// # 参数
    ///
    /// * `attempt` - 已完成的尝试次数
    /// * `base_time` - 计算基准时间
    pub fn next_retry_time(&self, attempt: i32, base_time: DateTime<Utc>) -> DateTime<Utc> {
        base_time + Duration::milliseconds(self.backoff_ms(attempt) as i64)
    }

    /// 是否还应继续重试
    ///
    /// # 参数
    ///
    /// * `attempt` - 已完成的尝试次数
    /// * `max_attempts` - 最大尝试次数
    pub fn should_retry(&self, attempt: i32, max_attempts: i32) -> bool {
        attempt < max_attempts
    }
}
