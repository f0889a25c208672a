// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::RepositoryError;
use crate::queue::build_queue::QueueError;
use thiserror::Error;

/// 钩子处理错误类型
///
/// 覆盖事件翻译、Webhook 注册和触发提交过程中会返回给调用方的错误
#[derive(Error, Debug)]
pub enum HookError {
    /// 输入无效（URI 格式错误、参数个数错误、拉取请求编号非数字等）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 找不到指定的作业
    #[error("Cannot find job with the name {0}")]
    NotFound(String),

    /// 不支持的钩子操作
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// 作业配置尚未加载
    #[error("Job configuration is not available")]
    ConfigUnavailable,

    /// 持久化失败
    #[error("Persistence failure: {0}")]
    Persistence(RepositoryError),

    /// 调度器拒绝或不可用
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] QueueError),

    /// 序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RepositoryError> for HookError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConfigUnavailable => HookError::ConfigUnavailable,
            other => HookError::Persistence(other),
        }
    }
}

/// 单个端点的投递错误
///
/// 只记录日志，不会向上传播，也不会中断其他端点的投递
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// 签名失败（算法不支持或密钥无效）
    #[error("Cannot sign payload: {0}")]
    Signing(String),

    /// 端点返回非 2xx 状态码
    #[error("Endpoint responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// 网络或传输错误
    #[error("Transport error: {0}")]
    Transport(String),
}
