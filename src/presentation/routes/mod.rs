// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::services::completion_dispatcher::CompletionDispatcher;
use crate::domain::services::trigger_submitter::TriggerSubmitter;
use crate::domain::services::webhook_service::WebhookService;
use crate::domain::use_cases::release_webhook_event::ReleaseWebhookEventUseCase;
use crate::presentation::handlers::{build_handler, completion_handler, webhook_handler};
use crate::queue::build_queue::BuildScheduler;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 路由依赖的服务
pub struct AppServices<R: JobRepository, S: BuildScheduler, W: WebhookService> {
    pub submitter: Arc<TriggerSubmitter<R, S>>,
    pub release_webhooks: Arc<ReleaseWebhookEventUseCase<R>>,
    pub dispatcher: Arc<CompletionDispatcher<R, W>>,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<R, S, W>(services: AppServices<R, S, W>) -> Router
where
    R: JobRepository + 'static,
    S: BuildScheduler + 'static,
    W: WebhookService + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version));

    let hook_routes = Router::new()
        .route("/job/{name}/build", post(build_handler::build::<R, S>))
        .route(
            "/job/{name}/buildWithParameters",
            post(build_handler::build_with_parameters::<R, S>),
        )
        .route(
            "/job/{name}/completed",
            post(completion_handler::build_completed::<R, W>),
        )
        .route(
            "/team-events/rmwebhook",
            post(webhook_handler::release_webhook_event::<R>),
        )
        .layer(Extension(services.submitter))
        .layer(Extension(services.release_webhooks))
        .layer(Extension(services.dispatcher));

    Router::new()
        .merge(public_routes)
        .merge(hook_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
