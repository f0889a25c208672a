// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 发布 Webhook
///
/// 作业拥有的一个出站通知端点。同一作业内以规范化后的
/// `payload_url`（不区分大小写）作为身份。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseWebhook {
    /// 可选的显示名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 已规范化的回调地址
    pub payload_url: String,
    /// 签名密钥
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl ReleaseWebhook {
    /// 创建一个新的发布 Webhook
    ///
    /// `payload_url` 必须已经过 [`crate::utils::validators::normalize_payload_url`] 处理
    pub fn new(name: Option<String>, payload_url: String, secret: Option<String>) -> Self {
        Self {
            name: name.filter(|n| !n.trim().is_empty()),
            payload_url,
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn matches_url(&self, payload_url: &str) -> bool {
        self.payload_url.eq_ignore_ascii_case(payload_url)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(name))
    }

    /// 返回非空的签名密钥
    pub fn signing_secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    /// 日志中使用的标识
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.payload_url)
    }

    pub fn summary(&self) -> WebhookSummary {
        WebhookSummary {
            name: self.name.clone(),
            payload_url: self.payload_url.clone(),
        }
    }
}

// Secrets never reach the logs.
impl fmt::Debug for ReleaseWebhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseWebhook")
            .field("name", &self.name)
            .field("payload_url", &self.payload_url)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Webhook 列表项，不包含密钥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSummary {
    #[serde(rename = "WebhookName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "PayloadUrl")]
    pub payload_url: String,
}

/// 单次投递结果
///
/// 仅用于日志与调用方观测，不会持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    /// 目标 Webhook 标识
    pub webhook: String,
    /// 响应状态码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// 失败时的响应体
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_on_failure: Option<String>,
    /// 签名或传输错误
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self.body_on_failure.is_none()
            && self.http_status.is_some_and(|s| (200..300).contains(&s))
    }
}
