// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use axum_test::TestServer;
use parking_lot::Mutex;
use std::sync::Arc;
use teamhook::config::settings::DispatchSettings;
use teamhook::domain::models::job::Job;
use teamhook::domain::services::completion_dispatcher::CompletionDispatcher;
use teamhook::domain::services::trigger_submitter::TriggerSubmitter;
use teamhook::domain::services::webhook_registry::WebhookRegistry;
use teamhook::domain::use_cases::release_webhook_event::ReleaseWebhookEventUseCase;
use teamhook::infrastructure::repositories::job_repo_impl::InMemoryJobRepository;
use teamhook::infrastructure::services::webhook_service_impl::WebhookServiceImpl;
use teamhook::presentation::routes::{self, AppServices};
use teamhook::queue::build_queue::InMemoryBuildQueue;
use tokio::net::TcpListener;

pub const ROOT_URL: &str = "http://ci.example.com/";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryJobRepository>,
    pub queue: Arc<InMemoryBuildQueue>,
}

/// 使用给定作业创建测试应用
pub fn create_test_app(jobs: Vec<Job>) -> TestApp {
    let repo = Arc::new(InMemoryJobRepository::with_jobs(jobs));
    let queue = Arc::new(InMemoryBuildQueue::new());
    let webhook_service = Arc::new(WebhookServiceImpl::new(DispatchSettings::default()).unwrap());

    let services = AppServices {
        submitter: Arc::new(TriggerSubmitter::new(repo.clone(), queue.clone(), ROOT_URL)),
        release_webhooks: Arc::new(ReleaseWebhookEventUseCase::new(Arc::new(
            WebhookRegistry::new(repo.clone()),
        ))),
        dispatcher: Arc::new(CompletionDispatcher::new(repo.clone(), webhook_service)),
    };

    let server = TestServer::new(routes::routes(services)).unwrap();
    TestApp {
        server,
        repo,
        queue,
    }
}

/// 接收端记录的请求
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub headers: HeaderMap,
    pub body: String,
}

/// 本地 Webhook 接收端
pub struct Receiver {
    pub url: String,
    pub requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// 启动一个以固定状态码响应的接收端
pub async fn start_receiver(status: StatusCode) -> Receiver {
    let requests: Arc<Mutex<Vec<ReceivedRequest>>> = Arc::default();
    let recorded = requests.clone();

    let app = Router::new().route(
        "/webhook",
        post(move |headers: HeaderMap, body: Bytes| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().push(ReceivedRequest {
                    headers,
                    body: String::from_utf8_lossy(&body).to_string(),
                });
                (status, "received")
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Receiver {
        url: format!("http://{}/webhook", addr),
        requests,
    }
}
