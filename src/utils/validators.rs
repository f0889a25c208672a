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

use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// 值为空
    #[error("Payload URL is empty")]
    Empty,
    /// URL无效
    #[error("Malformed Payload URL ({0})")]
    InvalidUrl(String),
    /// 缺少主机名
    #[error("Payload URL has no host name")]
    MissingHost,
}

/// 检查原始字符串中的授权部分是否为空
///
/// `Url` 会把 `http:///path` 规范化为以 `path` 为主机的地址，
/// 因此需要在解析前单独检查 `scheme://` 之后是否紧跟主机。
fn raw_authority_is_empty(value: &str) -> bool {
    let Some((_, rest)) = value.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    host.is_empty() || host.starts_with(':')
}

/// 验证 Webhook 负载 URL
///
/// # 参数
///
/// * `value` - 用户提交的 URL 字符串
///
/// # 返回值
///
/// * `Ok(Url)` - 解析后的 URL
/// * `Err(ValidationError)` - 为空、格式错误或缺少主机名
pub fn validate_payload_url(value: &str) -> Result<Url, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    if raw_authority_is_empty(trimmed) {
        return Err(ValidationError::MissingHost);
    }

    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(ValidationError::MissingHost),
    }
}

/// 验证并规范化负载 URL，去除首尾空白和末尾的 `/`
///
/// 末尾连续多个 `/` 会全部去掉，`hook//` 与 `hook/` 视为同一个 URL
pub fn normalize_payload_url(value: &str) -> Result<String, ValidationError> {
    validate_payload_url(value)?;
    Ok(value.trim().trim_end_matches('/').to_string())
}
