// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供外部构建调度器的端口以及进程内的构建队列实现
pub mod build_queue;
