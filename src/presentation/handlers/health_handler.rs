// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::engines::health_monitor::HealthCheck;

/// 注册处健康检查
///
/// 强制获取一次门户会话并检查文档存储，返回两项布尔结果。
/// 任一项失败时返回 503。
pub async fn registry_health(
    Extension(health): Extension<Arc<dyn HealthCheck>>,
) -> impl IntoResponse {
    let report = health.check().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
