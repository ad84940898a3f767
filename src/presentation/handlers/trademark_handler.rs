// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::models::trademark::TrademarkRecord;
use crate::domain::repositories::trademark_repository::TrademarkRepository;
use crate::presentation::errors::AppError;

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 200;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

/// 最近保存的商标记录
///
/// # 参数
///
/// * `limit` - 返回条数，默认 20，最大 200
pub async fn recent_trademarks(
    Extension(trademarks): Extension<Arc<TrademarkRepository>>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<TrademarkRecord>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = trademarks.recent(limit).await?;
    Ok(Json(records))
}
