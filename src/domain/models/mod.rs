// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 触发事件（trigger_event）：代码推送或拉取请求合并的类型化意图
/// - 网络钩子（webhook）：作业拥有的出站通知端点
/// - 作业（job）：作业及其按类型标记的绑定记录
/// - 调度（schedule）：因果注释、调度请求和队列项
/// - 钩子事件（hook_event）：Webhook 管理操作及其资源
pub mod hook_event;
pub mod job;
pub mod schedule;
pub mod trigger_event;
pub mod webhook;
