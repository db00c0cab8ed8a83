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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器和Webhook投递等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// Webhook投递配置
    pub webhook: WebhookSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Prometheus指标导出端口
    pub metrics_port: u16,
}

/// Webhook投递配置设置
#[derive(Debug, Deserialize)]
pub struct WebhookSettings {
    /// 出站请求User-Agent标识
    pub user_agent: String,
    /// 重试调度器轮询间隔（秒）
    pub retry_interval_secs: u64,
    /// 每轮重试批次大小
    pub retry_batch_size: u64,
    /// 重试批次内的并发数
    pub retry_concurrency: usize,
    /// 分发时单事件扇出的并发数
    pub dispatch_concurrency: usize,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.metrics_port", 9000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Webhook delivery settings
            .set_default("webhook.user_agent", "Hookrs-Webhook/1.0")?
            .set_default("webhook.retry_interval_secs", 5)?
            .set_default("webhook.retry_batch_size", 100)?
            .set_default("webhook.retry_concurrency", 10)?
            .set_default("webhook.dispatch_concurrency", 10)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HOOKRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
