// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::schedule::{
    BuildAction, QueueItem, ScheduleRequest, ScheduleResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 调度器拒绝请求
    #[error("Scheduler rejected build of job '{0}'")]
    Rejected(String),

    /// 调度器不可用
    #[error("Scheduler unavailable: {0}")]
    Unavailable(String),
}

/// 构建调度器特质
///
/// 外部作业调度器的端口：接收触发意图和有序因果注释，返回可调度项引用
#[async_trait]
pub trait BuildScheduler: Send + Sync {
    /// 调度一次构建
    async fn schedule(&self, request: ScheduleRequest) -> Result<ScheduleResult, QueueError>;
}

/// 等待执行的构建
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBuild {
    pub item: QueueItem,
    pub job_name: String,
    pub actions: Vec<BuildAction>,
    /// 延迟结束、可以开始执行的时间
    pub eligible_at: DateTime<Utc>,
}

/// 进程内构建队列
///
/// 同一作业、相同触发参数的待执行请求会被合并进已有队列项，
/// 此时不返回新的队列项
#[derive(Debug, Default)]
pub struct InMemoryBuildQueue {
    next_id: AtomicU64,
    pending: Mutex<Vec<PendingBuild>>,
}

impl InMemoryBuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前等待中的构建
    pub fn pending(&self) -> Vec<PendingBuild> {
        self.pending.lock().clone()
    }

    /// 取出已到期的构建
    pub fn take_eligible(&self, now: DateTime<Utc>) -> Vec<PendingBuild> {
        let mut pending = self.pending.lock();
        let (ready, waiting): (Vec<_>, Vec<_>) =
            pending.drain(..).partition(|build| build.eligible_at <= now);
        *pending = waiting;
        ready
    }

    /// 周期性地释放已到期的构建
    ///
    /// 进程内队列没有真正的执行器，到期的构建只记录日志后出队
    pub async fn run(self: Arc<Self>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            for build in self.take_eligible(Utc::now()) {
                info!(
                    "Starting build of job {} from queue item {} with {} actions",
                    build.job_name,
                    build.item.id,
                    build.actions.len()
                );
            }
        }
    }
}

#[async_trait]
impl BuildScheduler for InMemoryBuildQueue {
    async fn schedule(&self, request: ScheduleRequest) -> Result<ScheduleResult, QueueError> {
        let now = Utc::now();
        let eligible_at = chrono::Duration::from_std(request.delay)
            .ok()
            .and_then(|delay| now.checked_add_signed(delay))
            .ok_or_else(|| QueueError::Rejected(request.job_name.clone()))?;

        let mut pending = self.pending.lock();

        let existing = pending.iter_mut().find(|build| {
            build.job_name.eq_ignore_ascii_case(&request.job_name)
                && build_trigger(&build.actions) == request.trigger_event()
        });

        if let Some(build) = existing {
            // Fold the new causes into the queued item.
            build
                .actions
                .extend(request.causes().cloned().map(BuildAction::Cause));
            debug!(
                "Folded build request for job {} into queue item {}",
                request.job_name, build.item.id
            );
            return Ok(ScheduleResult { item: None });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = QueueItem {
            id,
            url: format!("queue/item/{}/", id),
            queued_at: now,
        };

        pending.push(PendingBuild {
            item: item.clone(),
            job_name: request.job_name,
            actions: request.actions,
            eligible_at,
        });

        Ok(ScheduleResult { item: Some(item) })
    }
}

fn build_trigger(actions: &[BuildAction]) -> Option<&crate::domain::models::trigger_event::TriggerEvent> {
    actions.iter().find_map(|action| match action {
        BuildAction::TriggerParameters { event } => Some(event),
        BuildAction::Cause(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::schedule::Cause;

    fn request(job: &str, user: &str) -> ScheduleRequest {
        ScheduleRequest {
            job_name: job.to_string(),
            delay: Duration::ZERO,
            actions: vec![BuildAction::Cause(Cause::user(Some(user)))],
        }
    }

    #[tokio::test]
    async fn test_schedule_assigns_incrementing_items() {
        let queue = InMemoryBuildQueue::new();

        let first = queue.schedule(request("app", "alice")).await.unwrap();
        let second = queue.schedule(request("other", "bob")).await.unwrap();

        assert_eq!(first.item.unwrap().url, "queue/item/1/");
        assert_eq!(second.item.unwrap().id, 2);
        assert_eq!(queue.pending().len(), 2);
    }

    #[tokio::test]
    async fn test_identical_request_is_folded() {
        let queue = InMemoryBuildQueue::new();

        queue.schedule(request("app", "alice")).await.unwrap();
        let folded = queue.schedule(request("APP", "bob")).await.unwrap();

        assert!(folded.item.is_none());
        let pending = queue.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].actions.len(), 2);
    }

    #[tokio::test]
    async fn test_out_of_range_delay_is_rejected() {
        let queue = InMemoryBuildQueue::new();
        let mut delayed = request("app", "alice");
        delayed.delay = Duration::from_secs(10_000_000_000_000);

        let result = queue.schedule(delayed).await;

        assert!(matches!(result, Err(QueueError::Rejected(_))));
        assert!(queue.pending().is_empty());
    }

    #[tokio::test]
    async fn test_take_eligible_respects_delay() {
        let queue = InMemoryBuildQueue::new();
        let mut delayed = request("app", "alice");
        delayed.delay = Duration::from_secs(3600);
        queue.schedule(delayed).await.unwrap();
        queue.schedule(request("now", "bob")).await.unwrap();

        let ready = queue.take_eligible(Utc::now());

        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].job_name, "now");
        assert_eq!(queue.pending().len(), 1);
    }
}
