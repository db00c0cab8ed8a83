// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 传输错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    /// 请求超时
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),
    /// 网络错误
    #[error("network error: {0}")]
    Network(String),
}

/// 出站HTTP请求
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// 目标URL
    pub url: String,
    /// 请求头
    pub headers: Vec<(String, String)>,
    /// 请求体字节
    pub body: Vec<u8>,
    /// 单次请求超时时间
    pub timeout: Duration,
}

/// 出站HTTP响应
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP状态码
    pub status: u16,
    /// 响应头
    pub headers: Vec<(String, String)>,
    /// 响应体
    pub body: String,
}

/// Webhook传输特质
///
/// 投递执行器唯一的网络依赖。生产环境由reqwest实现，
/// 测试中可注入假传输以脱离真实网络。
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// 发送一次受超时约束的POST请求
    ///
    /// # 参数
    ///
    /// * `request` - 出站请求
    ///
    /// # 返回值
    ///
    /// * `Ok(TransportResponse)` - 收到HTTP响应，无论状态码
    /// * `Err(TransportError)` - 超时或网络层失败
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
