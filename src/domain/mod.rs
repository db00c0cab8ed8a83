// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 包含系统的核心业务逻辑，独立于具体技术实现：
/// - 模型（models）：核心业务实体与状态机
/// - 仓库接口（repositories）：数据访问抽象
/// - 服务（services）：投递执行器与传输抽象
/// - 用例（use_cases）：业务操作入口
pub mod models;
pub mod repositories;
pub mod services;
pub mod use_cases;
