// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::HookError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 发布 Webhook 管理操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOperation {
    Create,
    Remove,
    List,
}

impl HookOperation {
    pub const CREATE_EVENT: &'static str = "rmwebhook-create";
    pub const REMOVE_EVENT: &'static str = "rmwebhook-remove";
    pub const LIST_EVENT: &'static str = "rmwebhook-list";
}

impl FromStr for HookOperation {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::CREATE_EVENT) {
            Ok(HookOperation::Create)
        } else if s.eq_ignore_ascii_case(Self::REMOVE_EVENT) {
            Ok(HookOperation::Remove)
        } else if s.eq_ignore_ascii_case(Self::LIST_EVENT) {
            Ok(HookOperation::List)
        } else {
            Err(HookError::UnsupportedOperation(format!(
                "Webhook operation {} is not supported",
                s
            )))
        }
    }
}

/// 发布 Webhook 管理资源
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseWebhookResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_name: Option<String>,
    #[serde(default)]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_url: Option<String>,
    /// 回显时不包含密钥
    #[serde(default, skip_serializing)]
    pub secret: Option<String>,
}

/// 上游事件分发器发送的管理事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookEvent {
    pub event_type: String,
    #[serde(default)]
    pub resource: ReleaseWebhookResource,
}
