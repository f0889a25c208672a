// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{DispatchOutcome, ReleaseWebhook};
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::webhook_service::WebhookService;
use crate::utils::errors::{DispatchError, HookError};
use futures::future::join_all;
use metrics::{counter, histogram};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 构建完成通知分发器
///
/// 构建完成后向作业的每个发布 Webhook 投递通知。
/// 端点之间相互隔离，一个端点失败不会影响其他端点。
pub struct CompletionDispatcher<R: JobRepository, W: WebhookService> {
    repo: Arc<R>,
    webhook_service: Arc<W>,
}

/// 构造通知负载
///
/// 构建摘要对象（非对象视为空对象）合并作业名称和发起者
pub fn build_completion_body(job_name: &str, build_summary: Value, started_by: Option<&str>) -> Value {
    let mut body = match build_summary {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    body.insert("name".to_string(), Value::String(job_name.to_string()));
    body.insert(
        "startedBy".to_string(),
        Value::String(started_by.unwrap_or_default().to_string()),
    );
    Value::Object(body)
}

impl<R: JobRepository, W: WebhookService> CompletionDispatcher<R, W> {
    pub fn new(repo: Arc<R>, webhook_service: Arc<W>) -> Self {
        Self {
            repo,
            webhook_service,
        }
    }

    /// 分发构建完成通知
    ///
    /// # 参数
    ///
    /// * `job_name` - 已完成构建的作业
    /// * `build_summary` - 构建摘要 JSON
    /// * `started_by` - 发起构建的用户
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<DispatchOutcome>)` - 每个端点的投递结果
    /// * `Err(HookError)` - 作业不存在或配置不可用
    pub async fn dispatch_completion(
        &self,
        job_name: &str,
        build_summary: Value,
        started_by: Option<&str>,
    ) -> Result<Vec<DispatchOutcome>, HookError> {
        let job = self
            .repo
            .find_by_name(job_name)
            .await?
            .ok_or_else(|| HookError::NotFound(job_name.to_string()))?;

        let body = build_completion_body(&job.name, build_summary, started_by);
        let payload = serde_json::to_string(&body)?;

        let deliveries = job
            .release_webhooks()
            .map(|webhook| self.deliver(webhook, &payload));
        let outcomes = join_all(deliveries).await;

        let delivered = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            "Dispatched completion of job {} to {}/{} release webhooks",
            job.name,
            delivered,
            outcomes.len()
        );
        Ok(outcomes)
    }

    async fn deliver(&self, webhook: &ReleaseWebhook, payload: &str) -> DispatchOutcome {
        let started = Instant::now();
        let result = self.webhook_service.send_webhook(webhook, payload).await;
        histogram!("webhook_delivery_duration_seconds").record(started.elapsed().as_secs_f64());

        let mut outcome = DispatchOutcome {
            webhook: webhook.label().to_string(),
            http_status: None,
            body_on_failure: None,
            error: None,
        };

        match result {
            Ok(status) => {
                counter!("webhook_deliveries_total", "outcome" => "success").increment(1);
                outcome.http_status = Some(status);
            }
            Err(DispatchError::Status { status, body }) => {
                counter!("webhook_deliveries_total", "outcome" => "rejected").increment(1);
                warn!(
                    "Release webhook {} responded with status {}: {}",
                    webhook.label(),
                    status,
                    body
                );
                outcome.http_status = Some(status);
                outcome.body_on_failure = Some(body);
            }
            Err(e) => {
                counter!("webhook_deliveries_total", "outcome" => "error").increment(1);
                warn!("Failed to deliver release webhook {}: {}", webhook.label(), e);
                outcome.error = Some(e.to_string());
            }
        }

        outcome
    }
}
