// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::webhook::DispatchOutcome;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::completion_dispatcher::CompletionDispatcher;
use crate::domain::services::webhook_service::WebhookService;
use crate::presentation::errors::AppError;
use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// 构建完成通知请求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPayload {
    /// 构建摘要
    #[serde(default)]
    pub build: Value,
    /// 发起构建的用户
    #[serde(default)]
    pub started_by: Option<String>,
}

/// 分发构建完成通知，返回每个端点的投递结果
pub async fn build_completed<R, W>(
    Path(name): Path<String>,
    Extension(dispatcher): Extension<Arc<CompletionDispatcher<R, W>>>,
    Json(payload): Json<CompletionPayload>,
) -> Result<Json<Vec<DispatchOutcome>>, AppError>
where
    R: JobRepository + 'static,
    W: WebhookService + 'static,
{
    let outcomes = dispatcher
        .dispatch_completion(&name, payload.build, payload.started_by.as_deref())
        .await?;
    Ok(Json(outcomes))
}
