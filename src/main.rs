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

use std::sync::Arc;
use std::time::Duration;
use teamhook::config::settings::Settings;
use teamhook::domain::repositories::job_repository::JobRepository;
use teamhook::domain::services::completion_dispatcher::CompletionDispatcher;
use teamhook::domain::services::trigger_submitter::TriggerSubmitter;
use teamhook::domain::services::webhook_registry::WebhookRegistry;
use teamhook::domain::use_cases::release_webhook_event::ReleaseWebhookEventUseCase;
use teamhook::infrastructure::metrics;
use teamhook::infrastructure::repositories::job_repo_impl::{
    FileJobRepository, InMemoryJobRepository,
};
use teamhook::infrastructure::services::webhook_service_impl::WebhookServiceImpl;
use teamhook::presentation::routes::{self, AppServices};
use teamhook::queue::build_queue::InMemoryBuildQueue;
use teamhook::utils::telemetry;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);
    info!("Starting teamhook...");

    // 3. Initialize Prometheus Metrics
    metrics::init_metrics(&settings.metrics);

    // 4. Load jobs
    match settings.storage.storage_type.as_str() {
        "memory" => {
            warn!("Using in-memory job storage, registrations are lost on restart");
            serve(settings, Arc::new(InMemoryJobRepository::new())).await
        }
        _ => {
            let repo = FileJobRepository::new(&settings.storage.jobs_path);
            repo.load().await?;
            serve(settings, Arc::new(repo)).await
        }
    }
}

async fn serve<R: JobRepository + 'static>(settings: Settings, repo: Arc<R>) -> anyhow::Result<()> {
    // 5. Initialize Components
    let queue = Arc::new(InMemoryBuildQueue::new());
    tokio::spawn(queue.clone().run(Duration::from_secs(1)));

    let webhook_service = Arc::new(WebhookServiceImpl::new(settings.dispatch.clone())?);
    let registry = Arc::new(WebhookRegistry::new(repo.clone()));

    let services = AppServices {
        submitter: Arc::new(TriggerSubmitter::new(
            repo.clone(),
            queue,
            settings.server.root_url.clone(),
        )),
        release_webhooks: Arc::new(ReleaseWebhookEventUseCase::new(registry)),
        dispatcher: Arc::new(CompletionDispatcher::new(repo, webhook_service)),
    };

    // 6. Start HTTP server
    let app = routes::routes(services);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
