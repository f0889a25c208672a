// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use serde_json::{json, Value};
use teamhook::domain::models::schedule::{BuildAction, Cause};
use teamhook::domain::models::job::Job;
use teamhook::domain::models::trigger_event::{IterationId, TriggerEvent};

fn team_parameters(branch: &str) -> Vec<(&'static str, String)> {
    vec![
        ("_team-build_Build.Repository.Provider", "TfGit".to_string()),
        (
            "_team-build_System.TeamFoundationCollectionUri",
            "https://fabrikam.visualstudio.com/".to_string(),
        ),
        (
            "_team-build_Build.Repository.Uri",
            "https://fabrikam.visualstudio.com/_git/app".to_string(),
        ),
        ("_team-build_System.TeamProject", "Personal".to_string()),
        ("_team-build_Build.SourceVersion", "6a23fc7".to_string()),
        ("_team-build_Build.RequestedFor", "Olivia".to_string()),
        ("_team-build_Build.SourceBranch", branch.to_string()),
    ]
}

/// 测试 JSON 负载触发拉取请求构建
#[tokio::test]
async fn test_build_with_json_pull_request() {
    let app = create_test_app(vec![Job::new("app")]);

    let response = app
        .server
        .post("/job/APP/build")
        .add_header("X-Teamhook-User", "alice")
        .json(&json!({
            "team-parameters": {
                "collectionUri": "https://fabrikam.visualstudio.com/",
                "repoUri": "https://fabrikam.visualstudio.com/_git/app",
                "projectId": "Personal",
                "commit": "6a23fc7",
                "pushedBy": "olivia",
                "pullRequestId": 42
            }
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body, json!({ "created": "http://ci.example.com/queue/item/1/" }));

    let pending = app.queue.pending();
    let actions = &pending[0].actions;
    assert!(matches!(
        &actions[0],
        BuildAction::Cause(Cause::UserId { user_id: Some(user) }) if user == "alice"
    ));
    match actions.last() {
        Some(BuildAction::TriggerParameters { event }) => {
            assert_eq!(event.pull_request_id(), Some(42))
        }
        other => panic!("unexpected action {:?}", other),
    }
}

/// 测试空正文调度无参数构建，重复请求被合并
#[tokio::test]
async fn test_build_without_payload_is_folded() {
    let app = create_test_app(vec![Job::new("app")]);

    let first = app.server.post("/job/app/build").await;
    let second = app.server.post("/job/app/build?delay=5sec").await;

    assert_eq!(first.status_code(), StatusCode::CREATED);
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json::<Value>(), json!({}));
    assert_eq!(app.queue.pending().len(), 1);
}

/// 测试扁平参数触发拉取请求构建
#[tokio::test]
async fn test_build_with_parameters_pull_request() {
    let app = create_test_app(vec![Job::new("app")]);

    let response = app
        .server
        .post("/job/app/buildWithParameters?delay=10")
        .form(&team_parameters("refs/pull/7/merge"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let pending = app.queue.pending();
    let event = pending[0].actions.iter().find_map(|action| match action {
        BuildAction::TriggerParameters { event } => Some(event.clone()),
        BuildAction::Cause(_) => None,
    });
    match event {
        Some(TriggerEvent::PullRequestMerge(args)) => {
            assert_eq!(args.pull_request_id, 7);
            assert_eq!(args.iteration_id, IterationId::Unknown);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(pending[0].eligible_at > pending[0].item.queued_at);
}

/// 测试参数多值时返回 400 并指出参数名
#[tokio::test]
async fn test_build_with_duplicate_parameter_is_rejected() {
    let app = create_test_app(vec![Job::new("app")]);
    let mut parameters = team_parameters("refs/heads/main");
    parameters.push(("_team-build_System.TeamProject", "Other".to_string()));

    let response = app
        .server
        .post("/job/app/buildWithParameters")
        .form(&parameters)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("_team-build_System.TeamProject"));
    assert!(app.queue.pending().is_empty());
}

/// 测试非数字拉取请求编号返回 400
#[tokio::test]
async fn test_build_with_non_numeric_pull_request_id() {
    let app = create_test_app(vec![Job::new("app")]);

    let response = app
        .server
        .post("/job/app/buildWithParameters")
        .form(&team_parameters("refs/pull/abc/merge"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

/// 测试未知作业返回 404
#[tokio::test]
async fn test_build_unknown_job() {
    let app = create_test_app(vec![]);

    let response = app.server.post("/job/missing/build").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Cannot find job with the name missing");
}

/// 测试无效延迟返回 400
#[tokio::test]
async fn test_build_invalid_delay() {
    let app = create_test_app(vec![Job::new("app")]);

    let response = app.server.post("/job/app/build?delay=later").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

/// 测试超大延迟返回 400 且不入队
#[tokio::test]
async fn test_build_huge_delay_is_rejected() {
    let app = create_test_app(vec![Job::new("app")]);

    let response = app
        .server
        .post("/job/app/build?delay=10000000000000")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.queue.pending().is_empty());
}
