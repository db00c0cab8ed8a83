// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 定义Webhook投递的核心服务：
/// - 传输抽象（transport）：一次受限HTTP发送的最小接口
/// - 投递执行器（delivery_executor）：签名、发送与结果归类
pub mod delivery_executor;
pub mod transport;
