// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::trigger_event::TriggerEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 因果注释
///
/// 记录是谁或什么发起了这次构建
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cause {
    /// 由用户发起，`user_id` 为空表示匿名
    UserId { user_id: Option<String> },
    /// 由远程钩子发起
    RemoteHook { source: String },
    /// 由上游构建发起
    Upstream { job: String, build: u64 },
}

impl Cause {
    pub fn user(user_id: Option<&str>) -> Self {
        Cause::UserId {
            user_id: user_id.filter(|u| !u.is_empty()).map(str::to_string),
        }
    }
}

/// 构建动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BuildAction {
    /// 因果注释
    Cause(Cause),
    /// 以单个构建参数附加的触发事件
    TriggerParameters { event: TriggerEvent },
}

/// 调度请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    /// 作业名称
    pub job_name: String,
    /// 排队前的延迟
    pub delay: Duration,
    /// 有序的构建动作
    pub actions: Vec<BuildAction>,
}

impl ScheduleRequest {
    pub fn causes(&self) -> impl Iterator<Item = &Cause> {
        self.actions.iter().filter_map(|action| match action {
            BuildAction::Cause(cause) => Some(cause),
            BuildAction::TriggerParameters { .. } => None,
        })
    }

    pub fn trigger_event(&self) -> Option<&TriggerEvent> {
        self.actions.iter().find_map(|action| match action {
            BuildAction::TriggerParameters { event } => Some(event),
            BuildAction::Cause(_) => None,
        })
    }
}

/// 队列项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// 队列项编号
    pub id: u64,
    /// 相对于根地址的 URL
    pub url: String,
    /// 入队时间
    pub queued_at: DateTime<Utc>,
}

/// 调度结果
///
/// `item` 为空表示请求被合并或仅排队，无法立即得到队列项
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleResult {
    pub item: Option<QueueItem>,
}

/// 触发提交响应
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// 队列项的绝对 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}
