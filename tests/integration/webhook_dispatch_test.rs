// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, start_receiver};
use axum::http::StatusCode;
use serde_json::{json, Value};
use teamhook::domain::models::job::{Job, JobBinding};
use teamhook::domain::models::webhook::{DispatchOutcome, ReleaseWebhook};
use teamhook::infrastructure::services::webhook_service_impl::verify_signature;

fn release_webhook(url: &str, secret: Option<&str>) -> JobBinding {
    JobBinding::ReleaseWebhook(ReleaseWebhook::new(
        None,
        url.to_string(),
        secret.map(str::to_string),
    ))
}

/// 测试失败端点不影响其他端点，且签名可被接收端验证
#[tokio::test]
async fn test_completion_dispatch_isolates_failures() {
    let failing = start_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
    let healthy = start_receiver(StatusCode::OK).await;
    let app = create_test_app(vec![Job::new("app")
        .with_binding(release_webhook(&failing.url, Some("first")))
        .with_binding(release_webhook(&healthy.url, Some("s3cret")))]);

    let response = app
        .server
        .post("/job/app/completed")
        .json(&json!({ "build": { "number": 12, "result": "SUCCESS" }, "startedBy": "alice" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let outcomes: Vec<DispatchOutcome> = response.json();
    assert_eq!(outcomes.len(), 2);
    let failed = outcomes.iter().find(|o| o.webhook == failing.url).unwrap();
    assert_eq!(failed.http_status, Some(500));
    assert_eq!(failed.body_on_failure.as_deref(), Some("received"));
    assert!(outcomes.iter().find(|o| o.webhook == healthy.url).unwrap().is_success());

    let received = healthy.requests.lock().clone();
    assert_eq!(received.len(), 1);
    let request = &received[0];
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(
        body,
        json!({ "number": 12, "result": "SUCCESS", "name": "app", "startedBy": "alice" })
    );
    assert_eq!(
        request.headers["accept"],
        "application/json; api-version=5.0-preview"
    );
    assert_eq!(request.headers["content-type"], "application/json");
    let signature = request.headers["x-teamhook-signature"].to_str().unwrap();
    assert!(verify_signature("s3cret", &request.body, signature));
    assert_eq!(failing.requests.lock().len(), 1);
}

/// 测试没有密钥时不发送签名头
#[tokio::test]
async fn test_completion_dispatch_without_secret_is_unsigned() {
    let receiver = start_receiver(StatusCode::OK).await;
    let app = create_test_app(vec![
        Job::new("app").with_binding(release_webhook(&receiver.url, None))
    ]);

    app.server
        .post("/job/app/completed")
        .json(&json!({}))
        .await;

    let received = receiver.requests.lock().clone();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("x-teamhook-signature").is_none());
    assert!(received[0].headers.get("x-teamhook-delivery").is_some());
    let body: Value = serde_json::from_str(&received[0].body).unwrap();
    assert_eq!(body, json!({ "name": "app", "startedBy": "" }));
}

/// 测试传输错误被记录，不中断分发
#[tokio::test]
async fn test_completion_dispatch_transport_error() {
    let receiver = start_receiver(StatusCode::OK).await;
    let app = create_test_app(vec![Job::new("app")
        .with_binding(release_webhook("http://127.0.0.1:1/unreachable", None))
        .with_binding(release_webhook(&receiver.url, None))]);

    let outcomes: Vec<DispatchOutcome> = app
        .server
        .post("/job/app/completed")
        .json(&json!({ "build": 1 }))
        .await
        .json();

    let unreachable = outcomes
        .iter()
        .find(|o| o.webhook == "http://127.0.0.1:1/unreachable")
        .unwrap();
    assert!(unreachable.error.is_some());
    assert_eq!(receiver.requests.lock().len(), 1);
}

/// 测试未知作业返回 404
#[tokio::test]
async fn test_completion_unknown_job() {
    let app = create_test_app(vec![]);

    let response = app
        .server
        .post("/job/missing/completed")
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
