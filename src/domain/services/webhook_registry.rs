// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobBinding};
use crate::domain::models::webhook::{ReleaseWebhook, WebhookSummary};
use crate::domain::repositories::job_repository::JobRepository;
use crate::utils::errors::HookError;
use crate::utils::validators::normalize_payload_url;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 发布 Webhook 注册表
///
/// 每个作业拥有自己的 Webhook 列表，修改操作在作业级别的临界区内执行，
/// 不同作业之间互不阻塞
pub struct WebhookRegistry<R: JobRepository> {
    repo: Arc<R>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<R: JobRepository> WebhookRegistry<R> {
    /// 创建新的注册表
    ///
    /// # 参数
    ///
    /// * `repo` - 作业仓库
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            locks: DashMap::new(),
        }
    }

    fn job_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks.entry(key.to_string()).or_default().clone()
    }

    /// 释放作业锁，没有其他持有者时从表中移除
    fn release_lock(&self, key: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn load_job(&self, job_name: &str) -> Result<Job, HookError> {
        if job_name.trim().is_empty() {
            return Err(HookError::InvalidInput(
                "Project name must not be empty".to_string(),
            ));
        }

        self.repo
            .find_by_name(job_name)
            .await?
            .ok_or_else(|| HookError::NotFound(job_name.to_string()))
    }

    /// 为作业创建发布 Webhook
    ///
    /// 作业中已存在相同 URL 的 Webhook 时直接复用，不会重复创建也不会保存
    pub async fn create(
        &self,
        job_name: &str,
        name: Option<&str>,
        payload_url: &str,
        secret: Option<&str>,
    ) -> Result<ReleaseWebhook, HookError> {
        let payload_url =
            normalize_payload_url(payload_url).map_err(|e| HookError::InvalidInput(e.to_string()))?;

        // unknown jobs never get a lock entry
        self.load_job(job_name).await?;

        let key = job_name.to_lowercase();
        let lock = self.job_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            self.create_locked(job_name, name, payload_url, secret).await
        };
        self.release_lock(&key, lock);
        result
    }

    async fn create_locked(
        &self,
        job_name: &str,
        name: Option<&str>,
        payload_url: String,
        secret: Option<&str>,
    ) -> Result<ReleaseWebhook, HookError> {
        let mut job = self.load_job(job_name).await?;
        if let Some(existing) = job.find_webhook_by_url(&payload_url) {
            debug!(
                "Job {} already owns webhook {}, reusing it",
                job.name, existing.payload_url
            );
            return Ok(existing.clone());
        }

        let webhook = ReleaseWebhook::new(
            name.map(str::to_string),
            payload_url,
            secret.map(str::to_string),
        );
        job.bindings.push(JobBinding::ReleaseWebhook(webhook.clone()));
        self.repo.save(&job).await?;

        info!("Added release webhook {} to job {}", webhook.label(), job.name);
        Ok(webhook)
    }

    /// 从作业删除发布 Webhook
    ///
    /// 提供 URL 时按 URL 匹配，否则按名称匹配。只影响调用的作业。
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 删除了一个 Webhook
    /// * `Ok(false)` - 没有匹配的 Webhook
    pub async fn delete(
        &self,
        job_name: &str,
        name: Option<&str>,
        payload_url: Option<&str>,
    ) -> Result<bool, HookError> {
        let payload_url = payload_url
            .filter(|url| !url.trim().is_empty())
            .map(normalize_payload_url)
            .transpose()
            .map_err(|e| HookError::InvalidInput(e.to_string()))?;
        let name = name.filter(|n| !n.trim().is_empty());

        if payload_url.is_none() && name.is_none() {
            return Err(HookError::InvalidInput(
                "Either a webhook name or a payload URL is required".to_string(),
            ));
        }

        self.load_job(job_name).await?;

        let key = job_name.to_lowercase();
        let lock = self.job_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            self.delete_locked(job_name, name, payload_url.as_deref()).await
        };
        self.release_lock(&key, lock);
        result
    }

    async fn delete_locked(
        &self,
        job_name: &str,
        name: Option<&str>,
        payload_url: Option<&str>,
    ) -> Result<bool, HookError> {
        let mut job = self.load_job(job_name).await?;
        let removed = match (payload_url, name) {
            (Some(url), _) => job.remove_webhook(|w| w.matches_url(url)),
            (None, Some(name)) => job.remove_webhook(|w| w.matches_name(name)),
            (None, None) => None,
        };

        match removed {
            Some(webhook) => {
                self.repo.save(&job).await?;
                info!("Removed release webhook {} from job {}", webhook.label(), job.name);
                Ok(true)
            }
            None => {
                debug!("No matching release webhook on job {}", job.name);
                Ok(false)
            }
        }
    }

    /// 列出作业的发布 Webhook，按 URL 去重
    pub async fn list(&self, job_name: &str) -> Result<Vec<WebhookSummary>, HookError> {
        let job = self.load_job(job_name).await?;

        let mut summaries: Vec<WebhookSummary> = Vec::new();
        for webhook in job.release_webhooks() {
            let duplicate = summaries
                .iter()
                .any(|s| s.payload_url.eq_ignore_ascii_case(&webhook.payload_url));
            if !duplicate {
                summaries.push(webhook.summary());
            }
        }

        Ok(summaries)
    }
}
