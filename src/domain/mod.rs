// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：作业、发布 Webhook、触发事件和调度数据
/// - 仓库接口（repositories）：作业持久化抽象接口
/// - 服务（services）：事件翻译、Webhook 注册、通知分发和触发提交
/// - 用例（use_cases）：发布 Webhook 管理事件
pub mod models;
pub mod repositories;
pub mod services;
pub mod use_cases;
