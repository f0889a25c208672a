// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// 拉取请求迭代编号
///
/// 扁平参数路径无法得知迭代编号，此时使用 `Unknown`。
/// 线上格式为整数，`Unknown` 编码为 `-1`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationId {
    /// 已知的迭代编号
    Known(u32),
    /// 未知的迭代编号
    #[default]
    Unknown,
}

impl IterationId {
    /// 从线上整数创建，负数视为未知
    pub fn from_raw(value: i64) -> Self {
        u32::try_from(value)
            .map(IterationId::Known)
            .unwrap_or(IterationId::Unknown)
    }

    /// 转换为线上整数
    pub fn as_raw(self) -> i64 {
        match self {
            IterationId::Known(id) => i64::from(id),
            IterationId::Unknown => -1,
        }
    }
}

impl Serialize for IterationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for IterationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(IterationId::from_raw)
    }
}

impl fmt::Display for IterationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationId::Known(id) => write!(f, "{}", id),
            IterationId::Unknown => write!(f, "unknown"),
        }
    }
}

/// 代码推送事件参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitPushArgs {
    /// 团队集合地址
    pub collection_uri: Url,
    /// 仓库地址
    pub repo_uri: Url,
    /// 团队项目
    pub project_id: String,
    /// 提交 ID
    #[serde(rename = "commit", alias = "commitId")]
    pub commit_id: String,
    /// 推送者
    pub pushed_by: String,
}

/// 拉取请求合并提交事件参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestMergeArgs {
    #[serde(flatten)]
    pub push: CommitPushArgs,
    /// 拉取请求编号
    pub pull_request_id: u32,
    /// 迭代编号
    #[serde(default)]
    pub iteration_id: IterationId,
}

/// 触发事件
///
/// 描述是什么导致构建运行：一次代码推送或一次拉取请求合并
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerEvent {
    /// 代码推送
    CommitPush(CommitPushArgs),
    /// 拉取请求合并
    PullRequestMerge(PullRequestMergeArgs),
}

impl TriggerEvent {
    fn push(&self) -> &CommitPushArgs {
        match self {
            TriggerEvent::CommitPush(args) => args,
            TriggerEvent::PullRequestMerge(args) => &args.push,
        }
    }

    pub fn commit_id(&self) -> &str {
        &self.push().commit_id
    }

    pub fn pushed_by(&self) -> &str {
        &self.push().pushed_by
    }

    pub fn repo_uri(&self) -> &Url {
        &self.push().repo_uri
    }

    /// 仅拉取请求事件返回编号
    pub fn pull_request_id(&self) -> Option<u32> {
        match self {
            TriggerEvent::CommitPush(_) => None,
            TriggerEvent::PullRequestMerge(args) => Some(args.pull_request_id),
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerEvent::CommitPush(args) => {
                write!(f, "commit {} pushed by {}", args.commit_id, args.pushed_by)
            }
            TriggerEvent::PullRequestMerge(args) => write!(
                f,
                "pull request {} (iteration {}) merge commit {}",
                args.pull_request_id, args.iteration_id, args.push.commit_id
            ),
        }
    }
}

/// 事件翻译结果
///
/// `NoOp` 表示没有触发参数，调用方仍可调度一次无参数构建
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Trigger(TriggerEvent),
    NoOp,
}

impl Translation {
    pub fn into_event(self) -> Option<TriggerEvent> {
        match self {
            Translation::Trigger(event) => Some(event),
            Translation::NoOp => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Translation::NoOp)
    }
}
