// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::ReleaseWebhook;
use crate::utils::errors::DispatchError;
use async_trait::async_trait;

/// Webhook服务特质
///
/// 定义单个端点的投递逻辑
#[async_trait]
pub trait WebhookService: Send + Sync {
    /// 向发布 Webhook 投递负载
    ///
    /// # 参数
    ///
    /// * `webhook` - 目标端点，密钥非空时对负载签名
    /// * `payload` - 已序列化的 JSON 负载
    ///
    /// # 返回值
    ///
    /// * `Ok(u16)` - 端点返回的 2xx 状态码
    /// * `Err(DispatchError)` - 签名失败、非 2xx 响应或传输错误
    async fn send_webhook(
        &self,
        webhook: &ReleaseWebhook,
        payload: &str,
    ) -> Result<u16, DispatchError>;
}
