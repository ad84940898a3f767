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

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::application::{
    dto::crawl_request::CrawlRequestDto,
    use_cases::crawl_use_case::{CrawlUseCase, CrawlUseCaseError},
};

/// 启动（或继续）爬取任务
pub async fn create_crawl(
    Extension(use_case): Extension<Arc<CrawlUseCase>>,
    Json(payload): Json<CrawlRequestDto>,
) -> impl IntoResponse {
    match use_case.start(payload).await {
        Ok(started) => (StatusCode::ACCEPTED, Json(started)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 停止爬取任务
pub async fn stop_crawl(
    Extension(use_case): Extension<Arc<CrawlUseCase>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match use_case.stop(&job_id) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(json!({ "job_id": job_id, "status": "stopping" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// 获取爬取任务的检查点
pub async fn get_crawl(
    Extension(use_case): Extension<Arc<CrawlUseCase>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match use_case.get(&job_id).await {
        Ok(checkpoint) => (StatusCode::OK, Json(checkpoint)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 最近一个可恢复的爬取任务
pub async fn resume_crawl(
    Extension(use_case): Extension<Arc<CrawlUseCase>>,
) -> impl IntoResponse {
    match use_case.resume_suggestion().await {
        Ok(Some(suggestion)) => (StatusCode::OK, Json(suggestion)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No resumable crawl" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: CrawlUseCaseError) -> axum::response::Response {
    let (status, msg): (StatusCode, String) = e.into();
    (status, Json(json!({ "error": msg }))).into_response()
}

impl From<CrawlUseCaseError> for (StatusCode, String) {
    fn from(err: CrawlUseCaseError) -> Self {
        match err {
            CrawlUseCaseError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            CrawlUseCaseError::Repository(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            CrawlUseCaseError::NotFound => (StatusCode::NOT_FOUND, "Crawl not found".to_string()),
            e @ CrawlUseCaseError::NotRunning(_) => (StatusCode::CONFLICT, e.to_string()),
            e @ CrawlUseCaseError::AlreadyRunning(_) => (StatusCode::CONFLICT, e.to_string()),
            e @ CrawlUseCaseError::AlreadyCompleted(_) => (StatusCode::CONFLICT, e.to_string()),
            e @ CrawlUseCaseError::RangeMismatch { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
        }
    }
}
