// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::trigger_event::{
    CommitPushArgs, IterationId, PullRequestMergeArgs, Translation, TriggerEvent,
};
use crate::utils::errors::HookError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// JSON 负载中嵌套触发参数的字段名
pub const TEAM_PARAMETERS: &str = "team-parameters";
/// 扁平参数中团队构建变量的前缀
pub const TEAM_BUILD_PREFIX: &str = "_team-build_";
/// 仅处理该提供方的扁平参数
pub const TFGIT_PROVIDER: &str = "TfGit";
/// 拉取请求分支引用前缀
pub const REFS_PULL_SLASH: &str = "refs/pull/";

pub const BUILD_SOURCE_BRANCH: &str = "Build.SourceBranch";
pub const BUILD_REPOSITORY_PROVIDER: &str = "Build.Repository.Provider";
pub const BUILD_REPOSITORY_URI: &str = "Build.Repository.Uri";
pub const SYSTEM_TEAM_PROJECT: &str = "System.TeamProject";
pub const BUILD_SOURCE_VERSION: &str = "Build.SourceVersion";
pub const BUILD_REQUESTED_FOR: &str = "Build.RequestedFor";
pub const SYSTEM_TEAM_FOUNDATION_COLLECTION_URI: &str = "System.TeamFoundationCollectionUri";

const PULL_REQUEST_ID: &str = "pullRequestId";

/// 将 JSON 负载翻译为触发事件
///
/// 只要 `team-parameters` 中存在 `pullRequestId` 即视为拉取请求合并，
/// 不存在 `team-parameters` 时返回 `NoOp`
pub fn translate_json(payload: &Value) -> Result<Translation, HookError> {
    let Some(parameters) = payload.get(TEAM_PARAMETERS) else {
        return Ok(Translation::NoOp);
    };

    if !parameters.is_object() {
        return Err(HookError::InvalidInput(format!(
            "'{}' must be a JSON object",
            TEAM_PARAMETERS
        )));
    }

    let event = if parameters.get(PULL_REQUEST_ID).is_some() {
        TriggerEvent::PullRequestMerge(parse_parameters::<PullRequestMergeArgs>(parameters)?)
    } else {
        TriggerEvent::CommitPush(parse_parameters::<CommitPushArgs>(parameters)?)
    };

    Ok(Translation::Trigger(event))
}

fn parse_parameters<T: DeserializeOwned>(parameters: &Value) -> Result<T, HookError> {
    T::deserialize(parameters)
        .map_err(|e| HookError::InvalidInput(format!("Invalid {}: {}", TEAM_PARAMETERS, e)))
}

/// 收集带前缀的团队构建参数并去掉前缀
///
/// 每个带前缀的键必须恰好有一个值
pub fn collect_team_parameters(
    parameters: &HashMap<String, Vec<String>>,
) -> Result<HashMap<String, String>, HookError> {
    let mut collected = HashMap::new();

    for (key, values) in parameters {
        let Some(name) = key.strip_prefix(TEAM_BUILD_PREFIX) else {
            continue;
        };

        match values.as_slice() {
            [value] => {
                collected.insert(name.to_string(), value.clone());
            }
            _ => {
                return Err(HookError::InvalidInput(format!(
                    "Expected exactly 1 value for parameter '{}' but found {}",
                    key,
                    values.len()
                )));
            }
        }
    }

    Ok(collected)
}

/// 将扁平参数翻译为触发事件
///
/// 仅 TfGit 仓库会产生触发事件，迭代编号总是未知
pub fn translate_parameters(
    parameters: &HashMap<String, Vec<String>>,
) -> Result<Translation, HookError> {
    let team = collect_team_parameters(parameters)?;

    let is_tfgit = team
        .get(BUILD_REPOSITORY_PROVIDER)
        .is_some_and(|provider| provider.eq_ignore_ascii_case(TFGIT_PROVIDER));
    if !is_tfgit {
        return Ok(Translation::NoOp);
    }

    let push = CommitPushArgs {
        collection_uri: required_url(&team, SYSTEM_TEAM_FOUNDATION_COLLECTION_URI)?,
        repo_uri: required_url(&team, BUILD_REPOSITORY_URI)?,
        project_id: required(&team, SYSTEM_TEAM_PROJECT)?.to_string(),
        commit_id: required(&team, BUILD_SOURCE_VERSION)?.to_string(),
        pushed_by: required(&team, BUILD_REQUESTED_FOR)?.to_string(),
    };

    let event = match determine_pull_request_id(&team)? {
        Some(pull_request_id) => TriggerEvent::PullRequestMerge(PullRequestMergeArgs {
            push,
            pull_request_id,
            iteration_id: IterationId::Unknown,
        }),
        None => TriggerEvent::CommitPush(push),
    };

    Ok(Translation::Trigger(event))
}

fn required<'a>(team: &'a HashMap<String, String>, key: &str) -> Result<&'a str, HookError> {
    team.get(key)
        .map(String::as_str)
        .ok_or_else(|| HookError::InvalidInput(format!("Missing parameter '{}{}'", TEAM_BUILD_PREFIX, key)))
}

fn required_url(team: &HashMap<String, String>, key: &str) -> Result<Url, HookError> {
    let raw = required(team, key)?;
    Url::parse(raw).map_err(|e| {
        HookError::InvalidInput(format!("Parameter '{}{}' is not a valid URI: {}", TEAM_BUILD_PREFIX, key, e))
    })
}

/// 从源分支推断拉取请求编号
pub fn determine_pull_request_id(
    team: &HashMap<String, String>,
) -> Result<Option<u32>, HookError> {
    match team.get(BUILD_SOURCE_BRANCH) {
        Some(branch) => parse_pull_request_id(branch),
        None => Ok(None),
    }
}

/// 解析 `refs/pull/{id}/...` 形式的分支引用
///
/// 缺少前缀或分隔符时不是拉取请求；编号无法解析时返回错误
pub fn parse_pull_request_id(source_branch: &str) -> Result<Option<u32>, HookError> {
    let Some(rest) = source_branch.strip_prefix(REFS_PULL_SLASH) else {
        return Ok(None);
    };

    match rest.find('/') {
        Some(index) if index > 0 => rest[..index].parse::<u32>().map(Some).map_err(|e| {
            HookError::InvalidInput(format!(
                "Unable to parse pull request id from '{}': {}",
                source_branch, e
            ))
        }),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "event_translator_test.rs"]
mod tests;
