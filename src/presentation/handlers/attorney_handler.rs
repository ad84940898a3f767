// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::domain::services::brand_count_service::BrandCountService;

#[derive(Debug, Deserialize)]
pub struct BrandCountQuery {
    pub limit: Option<u64>,
}

/// 统计代理人索引中每个代理人的商标数量
///
/// 同步执行，相邻查询之间有固定间隔，代理人较多时请求耗时较长。
/// 读取或写回代理人索引失败时返回 500。
pub async fn refresh_brand_counts(
    Extension(service): Extension<Arc<BrandCountService>>,
    Query(query): Query<BrandCountQuery>,
) -> impl IntoResponse {
    match service.refresh_all(query.limit).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "processed": summary.processed,
                "succeeded": summary.succeeded,
                "failed": summary.failed,
                "message": format!("Updated {} attorneys", summary.processed),
                "results": summary.results,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Brand count refresh failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
