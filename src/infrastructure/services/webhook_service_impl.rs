// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::DispatchSettings;
use crate::domain::models::webhook::ReleaseWebhook;
use crate::domain::services::webhook_service::WebhookService;
use crate::utils::errors::DispatchError;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use sha2::Sha256;
use std::time::Duration;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// 签名值前缀
pub const SIGNATURE_PREFIX: &str = "sha256=";
/// 投递编号头
pub const DELIVERY_HEADER: &str = "X-Teamhook-Delivery";

/// 为负载生成签名
///
/// # 返回值
///
/// `sha256=` 前缀加十六进制编码的 HMAC-SHA256 值
pub fn generate_signature(secret: &str, payload: &str) -> Result<String, DispatchError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| DispatchError::Signing(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// 校验签名头的值，用常量时间比较
pub fn verify_signature(secret: &str, payload: &str, signature: &str) -> bool {
    let Some(encoded) = signature.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(expected) = hex::decode(encoded) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Webhook服务实现
pub struct WebhookServiceImpl {
    /// HTTP 客户端
    client: reqwest::Client,
    /// 投递配置
    settings: DispatchSettings,
}

impl WebhookServiceImpl {
    /// 创建新的 Webhook 服务实现
    ///
    /// 配置无法构建客户端时（例如 User-Agent 含非法字符）返回错误，
    /// 不会退回到默认客户端
    pub fn new(settings: DispatchSettings) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| DispatchError::Transport(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    fn accept_header(&self) -> String {
        format!("application/json; api-version={}", self.settings.api_version)
    }
}

#[async_trait]
impl WebhookService for WebhookServiceImpl {
    async fn send_webhook(
        &self,
        webhook: &ReleaseWebhook,
        payload: &str,
    ) -> Result<u16, DispatchError> {
        let mut request = self
            .client
            .post(&webhook.payload_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, self.accept_header())
            .header(DELIVERY_HEADER, Uuid::new_v4().to_string());

        if let Some(secret) = webhook.signing_secret() {
            let signature = generate_signature(secret, payload)?;
            request = request.header(self.settings.signature_header.as_str(), signature);
        }

        let response = request
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DispatchError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
