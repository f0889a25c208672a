// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节：
/// - 指标（metrics）：Prometheus 导出器
/// - 仓库实现（repositories）：内存与文件作业仓库
/// - 服务实现（services）：基于 reqwest 的 Webhook 投递
///
/// 基础设施层依赖于领域层的抽象接口，确保领域层保持纯粹的业务逻辑。
pub mod metrics;
pub mod repositories;
pub mod services;
