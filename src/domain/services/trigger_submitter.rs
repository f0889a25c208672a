// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::schedule::{BuildAction, Cause, ScheduleRequest, SubmitResponse};
use crate::domain::models::trigger_event::Translation;
use crate::domain::repositories::job_repository::JobRepository;
use crate::queue::build_queue::BuildScheduler;
use crate::utils::errors::HookError;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 触发提交器
///
/// 把翻译后的触发事件和因果注释交给调度器，并返回排队项的绝对 URL
pub struct TriggerSubmitter<R: JobRepository, S: BuildScheduler> {
    repo: Arc<R>,
    scheduler: Arc<S>,
    root_url: String,
}

impl<R: JobRepository, S: BuildScheduler> TriggerSubmitter<R, S> {
    /// 创建新的触发提交器
    ///
    /// # 参数
    ///
    /// * `repo` - 作业仓库
    /// * `scheduler` - 构建调度器
    /// * `root_url` - 对外可见的根地址
    pub fn new(repo: Arc<R>, scheduler: Arc<S>, root_url: impl Into<String>) -> Self {
        let mut root_url = root_url.into();
        if !root_url.ends_with('/') {
            root_url.push('/');
        }
        Self {
            repo,
            scheduler,
            root_url,
        }
    }

    /// 提交一次构建
    ///
    /// 动作顺序：发起者注释、额外因果注释、触发参数（`NoOp` 时省略）
    pub async fn submit(
        &self,
        job_name: &str,
        translation: Translation,
        principal: Option<&str>,
        extra_causes: Vec<Cause>,
        delay: Duration,
    ) -> Result<SubmitResponse, HookError> {
        let job = self
            .repo
            .find_by_name(job_name)
            .await?
            .ok_or_else(|| HookError::NotFound(job_name.to_string()))?;

        let mut actions = Vec::with_capacity(extra_causes.len() + 2);
        actions.push(BuildAction::Cause(Cause::user(principal)));
        actions.extend(extra_causes.into_iter().map(BuildAction::Cause));

        let kind = match translation {
            Translation::Trigger(event) => {
                info!("Scheduling job {} for {}", job.name, event);
                let kind = if event.pull_request_id().is_some() {
                    "pull_request_merge"
                } else {
                    "commit_push"
                };
                actions.push(BuildAction::TriggerParameters { event });
                kind
            }
            Translation::NoOp => {
                info!("Scheduling job {} without trigger parameters", job.name);
                "none"
            }
        };
        counter!("build_triggers_total", "kind" => kind).increment(1);

        let result = self
            .scheduler
            .schedule(ScheduleRequest {
                job_name: job.name,
                delay,
                actions,
            })
            .await?;

        match result.item {
            Some(item) => Ok(SubmitResponse {
                created: Some(format!("{}{}", self.root_url, item.url)),
            }),
            None => {
                counter!("build_triggers_folded_total").increment(1);
                Ok(SubmitResponse::default())
            }
        }
    }
}
