// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::document_store::RepositoryError;
use validator::ValidationErrors;

/// 处理器错误
///
/// 存储错误按种类映射状态码，请求校验失败返回 400，其余一律 500
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            match err {
                RepositoryError::Database(_) | RepositoryError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            }
        } else if self.0.is::<ValidationErrors>() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
