// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use serde_json::{json, Value};
use teamhook::domain::models::job::{Job, JobBinding};
use teamhook::domain::repositories::job_repository::JobRepository;

fn hook_event(event_type: &str, project: &str, payload_url: Option<&str>) -> Value {
    json!({
        "eventType": event_type,
        "resource": {
            "webhookName": "deploy",
            "projectName": project,
            "payloadUrl": payload_url,
            "secret": "s3cret"
        }
    })
}

/// 测试创建、列出、删除发布 Webhook
#[tokio::test]
async fn test_release_webhook_lifecycle() {
    let app = create_test_app(vec![Job::new("app").with_binding(JobBinding::Other {
        action: "mailer".to_string(),
        config: json!({}),
    })]);

    let created = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-create", "app", Some("https://example.com/hook/")))
        .await;
    assert_eq!(created.status_code(), StatusCode::OK);
    let echoed: Value = created.json();
    assert_eq!(echoed["eventType"], "rmwebhook-create");
    assert!(echoed["resource"].get("secret").is_none());

    // Same URL with different case and trailing slash reuses the entry.
    app.server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-create", "APP", Some("HTTPS://EXAMPLE.COM/hook")))
        .await;

    let listed: Value = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-list", "app", None))
        .await
        .json();
    assert_eq!(
        listed,
        json!({ "ReleaseWebhooks": [{ "WebhookName": "deploy", "PayloadUrl": "https://example.com/hook" }] })
    );

    let removed = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-remove", "app", Some("https://example.com/hook")))
        .await;
    assert_eq!(removed.status_code(), StatusCode::OK);

    let job = app.repo.find_by_name("app").await.unwrap().unwrap();
    assert_eq!(job.release_webhooks().count(), 0);
    assert_eq!(job.bindings.len(), 1);
}

/// 测试不支持的操作返回 400
#[tokio::test]
async fn test_unsupported_operation() {
    let app = create_test_app(vec![Job::new("app")]);

    let response = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-rename", "app", None))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("rmwebhook-rename"));
}

/// 测试无效 URL 与空项目名
#[tokio::test]
async fn test_invalid_registration_input() {
    let app = create_test_app(vec![Job::new("app")]);

    let bad_url = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-create", "app", Some("http:///path")))
        .await;
    let no_project = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-list", "", None))
        .await;
    let unknown_project = app
        .server
        .post("/team-events/rmwebhook")
        .json(&hook_event("rmwebhook-list", "missing", None))
        .await;

    assert_eq!(bad_url.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(no_project.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_project.status_code(), StatusCode::NOT_FOUND);
}
