// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 完成通知分发（completion_dispatcher）：向作业的发布 Webhook 投递构建完成通知
/// - 事件翻译（event_translator）：把入站负载翻译为触发事件
/// - 触发提交（trigger_submitter）：把触发事件交给构建调度器
/// - Webhook 注册表（webhook_registry）：管理作业拥有的发布 Webhook
/// - Webhook 服务（webhook_service）：单个端点的投递接口
pub mod completion_dispatcher;
pub mod event_translator;
pub mod trigger_submitter;
pub mod webhook_registry;
pub mod webhook_service;
