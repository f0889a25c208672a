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

use crate::domain::models::hook_event::HookEvent;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::use_cases::release_webhook_event::ReleaseWebhookEventUseCase;
use crate::presentation::errors::AppError;
use axum::{Extension, Json};
use serde_json::Value;
use std::sync::Arc;

/// 处理发布 Webhook 管理事件
pub async fn release_webhook_event<R: JobRepository + 'static>(
    Extension(use_case): Extension<Arc<ReleaseWebhookEventUseCase<R>>>,
    Json(event): Json<HookEvent>,
) -> Result<Json<Value>, AppError> {
    let result = use_case.perform(&event).await?;
    Ok(Json(result))
}
