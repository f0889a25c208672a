// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hook_event::{HookEvent, HookOperation};
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::webhook_registry::WebhookRegistry;
use crate::utils::errors::HookError;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// 发布 Webhook 管理事件用例
///
/// 根据事件类型分派到注册表的创建、删除或列出操作
pub struct ReleaseWebhookEventUseCase<R: JobRepository> {
    registry: Arc<WebhookRegistry<R>>,
}

impl<R: JobRepository> ReleaseWebhookEventUseCase<R> {
    pub fn new(registry: Arc<WebhookRegistry<R>>) -> Self {
        Self { registry }
    }

    /// 执行管理事件
    ///
    /// # 返回值
    ///
    /// * 创建/删除 - 回显事件（不含密钥）
    /// * 列出 - `{"ReleaseWebhooks": [...]}`
    pub async fn perform(&self, event: &HookEvent) -> Result<Value, HookError> {
        let operation: HookOperation = event.event_type.parse()?;
        let resource = &event.resource;
        debug!(
            "Performing {} for project {}",
            event.event_type, resource.project_name
        );

        match operation {
            HookOperation::Create => {
                let payload_url = resource.payload_url.as_deref().ok_or_else(|| {
                    HookError::InvalidInput("Payload URL is required".to_string())
                })?;
                self.registry
                    .create(
                        &resource.project_name,
                        resource.webhook_name.as_deref(),
                        payload_url,
                        resource.secret.as_deref(),
                    )
                    .await?;
                Ok(serde_json::to_value(event)?)
            }
            HookOperation::Remove => {
                self.registry
                    .delete(
                        &resource.project_name,
                        resource.webhook_name.as_deref(),
                        resource.payload_url.as_deref(),
                    )
                    .await?;
                Ok(serde_json::to_value(event)?)
            }
            HookOperation::List => {
                let webhooks = self.registry.list(&resource.project_name).await?;
                Ok(json!({ "ReleaseWebhooks": webhooks }))
            }
        }
    }
}
