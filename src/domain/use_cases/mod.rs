// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域用例模块
///
/// 当前的用例：
/// - 发布 Webhook 管理事件（release_webhook_event）：创建、删除、列出作业的发布 Webhook
pub mod release_webhook_event;
