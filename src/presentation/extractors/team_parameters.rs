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

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::collections::HashMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 多值参数表
///
/// 合并查询字符串和表单正文中的参数，同名参数保留所有值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamParameters(pub HashMap<String, Vec<String>>);

impl TeamParameters {
    fn extend_from(&mut self, encoded: &[u8]) -> Result<(), Response> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(encoded).map_err(|e| reject(&e.to_string()))?;
        for (key, value) in pairs {
            self.0.entry(key).or_default().push(value);
        }
        Ok(())
    }
}

fn reject(message: &str) -> Response {
    let body = Json(json!({ "error": format!("Invalid parameters: {}", message) }));
    (StatusCode::BAD_REQUEST, body).into_response()
}

impl<S> FromRequest<S> for TeamParameters
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut parameters = TeamParameters::default();

        if let Some(query) = req.uri().query() {
            parameters.extend_from(query.as_bytes())?;
        }

        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            parameters.extend_from(&body)?;
        }

        Ok(parameters)
    }
}
