// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::transport::{
    TransportError, TransportRequest, TransportResponse, WebhookTransport,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

/// 基于reqwest的Webhook传输实现
#[derive(Clone)]
pub struct HttpTransport {
    /// HTTP客户端
    client: reqwest::Client,
}

impl HttpTransport {
    /// 创建新的HTTP传输实例
    ///
    /// 单次请求的超时时间由每个请求自带，客户端不设全局超时
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => {
                    warn!("Skipping invalid header: {}", name);
                }
            }
        }

        let timeout = request.timeout;
        let response = self
            .client
            .post(&request.url)
            .headers(headers)
            .body(request.body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::TimedOut(timeout)
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        // Reading the body counts against the same attempt timeout
        let body = match tokio::time::timeout(timeout, response.text()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return Err(TransportError::Network(e.to_string())),
            Err(_) => return Err(TransportError::TimedOut(timeout)),
        };

        Ok(TransportResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
