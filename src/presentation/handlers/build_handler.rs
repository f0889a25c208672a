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

use crate::domain::models::schedule::{Cause, SubmitResponse};
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::event_translator;
use crate::domain::services::trigger_submitter::TriggerSubmitter;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::team_parameters::TeamParameters;
use crate::queue::build_queue::BuildScheduler;
use crate::utils::errors::HookError;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// 发起者请求头
pub const USER_HEADER: &str = "X-Teamhook-User";

/// 构建请求的查询参数
#[derive(Debug, Default, Deserialize)]
pub struct BuildQuery {
    /// 排队延迟，例如 `10` 或 `10sec`
    pub delay: Option<String>,
}

/// 允许的最大排队延迟（秒），30 天
pub const MAX_DELAY_SECS: u64 = 30 * 24 * 60 * 60;

/// 解析排队延迟
///
/// 超过 [`MAX_DELAY_SECS`] 的延迟视为无效输入
pub fn parse_delay(raw: Option<&str>) -> Result<Duration, HookError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(Duration::ZERO);
    };
    let digits = raw.strip_suffix("sec").unwrap_or(raw).trim();
    let secs = digits
        .parse::<u64>()
        .map_err(|_| HookError::InvalidInput(format!("Invalid delay '{}'", raw)))?;
    if secs > MAX_DELAY_SECS {
        return Err(HookError::InvalidInput(format!(
            "Delay '{}' exceeds the maximum of {} seconds",
            raw, MAX_DELAY_SECS
        )));
    }
    Ok(Duration::from_secs(secs))
}

fn principal(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn submit_status(response: &SubmitResponse) -> StatusCode {
    if response.created.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

/// 使用 JSON 负载触发构建
///
/// 正文可以为空，此时调度一次无参数构建
pub async fn build<R, S>(
    Path(name): Path<String>,
    Query(query): Query<BuildQuery>,
    headers: HeaderMap,
    Extension(submitter): Extension<Arc<TriggerSubmitter<R, S>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError>
where
    R: JobRepository + 'static,
    S: BuildScheduler + 'static,
{
    let delay = parse_delay(query.delay.as_deref())?;
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| HookError::InvalidInput(format!("Malformed JSON payload: {}", e)))?
    };

    let translation = event_translator::translate_json(&payload)?;
    let response = submitter
        .submit(
            &name,
            translation,
            principal(&headers),
            vec![Cause::RemoteHook {
                source: "build".to_string(),
            }],
            delay,
        )
        .await?;

    Ok((submit_status(&response), Json(response)))
}

/// 使用扁平参数触发构建
pub async fn build_with_parameters<R, S>(
    Path(name): Path<String>,
    Query(query): Query<BuildQuery>,
    headers: HeaderMap,
    Extension(submitter): Extension<Arc<TriggerSubmitter<R, S>>>,
    TeamParameters(parameters): TeamParameters,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError>
where
    R: JobRepository + 'static,
    S: BuildScheduler + 'static,
{
    let delay = parse_delay(query.delay.as_deref())?;
    let translation = event_translator::translate_parameters(&parameters)?;
    let response = submitter
        .submit(
            &name,
            translation,
            principal(&headers),
            vec![Cause::RemoteHook {
                source: "buildWithParameters".to_string(),
            }],
            delay,
        )
        .await?;

    Ok((submit_status(&response), Json(response)))
}
