// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::Job;
use async_trait::async_trait;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 作业配置尚未加载
    #[error("Job configuration has not been loaded")]
    ConfigUnavailable,
}

/// 作业仓库特质
///
/// 定义作业及其绑定记录的数据访问接口
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 根据名称（不区分大小写）查找作业
    async fn find_by_name(&self, name: &str) -> Result<Option<Job>, RepositoryError>;
    /// 保存作业及其绑定记录
    async fn save(&self, job: &Job) -> Result<(), RepositoryError>;
}
