// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::webhook::ReleaseWebhook;
use serde::{Deserialize, Serialize};

/// 作业绑定记录
///
/// 作业的构建后动作列表，按类型标记而不是在运行时检查类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobBinding {
    /// 发布 Webhook 通知
    ReleaseWebhook(ReleaseWebhook),
    /// 其他构建后动作，原样保留
    Other {
        action: String,
        #[serde(default)]
        config: serde_json::Value,
    },
}

/// 作业实体
///
/// 以名称（不区分大小写）查找，绑定记录随作业一起持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// 作业名称
    pub name: String,
    /// 绑定记录
    #[serde(default)]
    pub bindings: Vec<JobBinding>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    pub fn with_binding(mut self, binding: JobBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// 所有发布 Webhook 绑定
    pub fn release_webhooks(&self) -> impl Iterator<Item = &ReleaseWebhook> {
        self.bindings.iter().filter_map(|binding| match binding {
            JobBinding::ReleaseWebhook(webhook) => Some(webhook),
            JobBinding::Other { .. } => None,
        })
    }

    pub fn find_webhook_by_url(&self, payload_url: &str) -> Option<&ReleaseWebhook> {
        self.release_webhooks()
            .find(|webhook| webhook.matches_url(payload_url))
    }

    /// 移除第一个满足条件的发布 Webhook，其他绑定不受影响
    pub fn remove_webhook<F>(&mut self, predicate: F) -> Option<ReleaseWebhook>
    where
        F: Fn(&ReleaseWebhook) -> bool,
    {
        let index = self.bindings.iter().position(|binding| match binding {
            JobBinding::ReleaseWebhook(webhook) => predicate(webhook),
            JobBinding::Other { .. } => false,
        })?;

        match self.bindings.remove(index) {
            JobBinding::ReleaseWebhook(webhook) => Some(webhook),
            JobBinding::Other { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_webhook_keeps_other_bindings() {
        let mut job = Job::new("build-app")
            .with_binding(JobBinding::Other {
                action: "mailer".to_string(),
                config: serde_json::json!({ "to": "ops@example.com" }),
            })
            .with_binding(JobBinding::ReleaseWebhook(ReleaseWebhook::new(
                None,
                "https://example.com/hook".to_string(),
                None,
            )));

        let removed = job.remove_webhook(|w| w.matches_url("HTTPS://EXAMPLE.COM/hook"));

        assert!(removed.is_some());
        assert_eq!(job.bindings.len(), 1);
        assert_eq!(job.release_webhooks().count(), 0);
    }

    #[test]
    fn test_bindings_roundtrip_with_kind_tag() {
        let job = Job::new("build-app").with_binding(JobBinding::ReleaseWebhook(
            ReleaseWebhook::new(Some("wh1".into()), "https://example.com/hook".into(), Some("s".into())),
        ));

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["bindings"][0]["kind"], "release_webhook");
        assert_eq!(value["bindings"][0]["payloadUrl"], "https://example.com/hook");

        let back: Job = serde_json::from_value(value).unwrap();
        assert_eq!(back, job);
    }
}
