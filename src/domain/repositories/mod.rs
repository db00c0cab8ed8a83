// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层的数据访问抽象：
/// - Webhook配置仓库（配置存储）
/// - 投递记录仓库（投递台账）
pub mod delivery_repository;
pub mod webhook_repository;
