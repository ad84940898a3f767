// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::application::dto::lookup_request::{LookupRequestDto, LookupResponseDto};
use crate::domain::models::trademark::TrademarkRecord;
use crate::domain::services::lookup_service::{LookupError, LookupService};

/// 交互查询
///
/// 单个申请号时直接返回记录，列表时返回 `{count, results}`，
/// 结果顺序与输入一致。查询失败的申请号以未找到记录返回。
pub async fn lookup(
    Extension(service): Extension<Arc<LookupService>>,
    Json(payload): Json<LookupRequestDto>,
) -> impl IntoResponse {
    let single = payload.is_single();
    let keys = payload.keys();

    match service.lookup_within_budget(&keys).await {
        Ok(results) if single => {
            let record = results
                .into_iter()
                .next()
                .unwrap_or_else(|| TrademarkRecord::not_found(keys.concat()));
            (StatusCode::OK, Json(record)).into_response()
        }
        Ok(results) => (StatusCode::OK, Json(LookupResponseDto::from(results))).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "error": msg }))).into_response()
        }
    }
}

impl From<LookupError> for (StatusCode, String) {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::EmptyRequest | LookupError::TooManyKeys(..) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            LookupError::BudgetExceeded(_) => (StatusCode::GATEWAY_TIMEOUT, err.to_string()),
        }
    }
}
