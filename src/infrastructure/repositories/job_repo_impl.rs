// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::Job;
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 内存作业仓库
///
/// 以小写名称为键保存作业，主要用于测试和无持久化的部署
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<String, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定作业创建仓库
    pub fn with_jobs(jobs: impl IntoIterator<Item = Job>) -> Self {
        let repo = Self::new();
        for job in jobs {
            repo.insert(job);
        }
        repo
    }

    pub fn insert(&self, job: Job) {
        self.jobs.write().insert(job.name.to_lowercase(), job);
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().get(&name.to_lowercase()).cloned())
    }

    async fn save(&self, job: &Job) -> Result<(), RepositoryError> {
        self.insert(job.clone());
        Ok(())
    }
}

/// 文件作业仓库
///
/// 每个作业对应目录下的一个 JSON 文档。使用前必须调用 [`FileJobRepository::load`]，
/// 否则所有操作都返回 `ConfigUnavailable`。
#[derive(Debug)]
pub struct FileJobRepository {
    dir: PathBuf,
    jobs: RwLock<Option<HashMap<String, Job>>>,
}

impl FileJobRepository {
    /// 创建新的文件作业仓库
    ///
    /// # 参数
    ///
    /// * `dir` - 保存作业文档的目录
    ///
    /// # 返回值
    ///
    /// 尚未加载的仓库实例
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            jobs: RwLock::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 从目录加载所有作业文档
    ///
    /// 目录不存在时会被创建。返回加载的作业数量。
    pub async fn load(&self) -> Result<usize, RepositoryError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut jobs = HashMap::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let content = tokio::fs::read(&path).await?;
            let job: Job = serde_json::from_slice(&content)?;
            debug!("Loaded job {} from {}", job.name, path.display());
            jobs.insert(job.name.to_lowercase(), job);
        }

        let count = jobs.len();
        *self.jobs.write() = Some(jobs);
        info!("Loaded {} jobs from {}", count, self.dir.display());
        Ok(count)
    }

    fn is_loaded(&self) -> bool {
        self.jobs.read().is_some()
    }

    fn job_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(name)))
    }
}

/// 作业名称转换为安全的文件名
///
/// 可读前缀加上小写名称的 SHA-256 摘要，清洗后相同的不同名称不会共用文件
fn file_stem(name: &str) -> String {
    let lower = name.to_lowercase();
    let digest = hex::encode(Sha256::digest(lower.as_bytes()));
    let readable: String = lower
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}", readable, &digest[..16])
}

#[async_trait]
impl JobRepository for FileJobRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Job>, RepositoryError> {
        let jobs = self.jobs.read();
        let jobs = jobs.as_ref().ok_or(RepositoryError::ConfigUnavailable)?;
        Ok(jobs.get(&name.to_lowercase()).cloned())
    }

    async fn save(&self, job: &Job) -> Result<(), RepositoryError> {
        if !self.is_loaded() {
            return Err(RepositoryError::ConfigUnavailable);
        }

        let path = self.job_path(&job.name);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(job)?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        if let Some(jobs) = self.jobs.write().as_mut() {
            jobs.insert(job.name.to_lowercase(), job.clone());
        }
        debug!("Saved job {} to {}", job.name, path.display());
        Ok(())
    }
}
