// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Json;
use validator::Validate;

use crate::application::dto::duplicate_request::{DuplicateRequestDto, DuplicateResponseDto};
use crate::domain::services::duplicate_matcher::find_duplicate_groups;
use crate::presentation::errors::AppError;

/// 查找疑似重复的联系人
///
/// 两两比较的开销随人数平方增长，放到阻塞线程池中执行
pub async fn find_duplicates(
    Json(payload): Json<DuplicateRequestDto>,
) -> Result<Json<DuplicateResponseDto>, AppError> {
    payload.validate()?;

    let sensitivity = payload.sensitivity;
    let groups = tokio::task::spawn_blocking(move || {
        find_duplicate_groups(&payload.prospects, sensitivity)
    })
    .await?;

    Ok(Json(DuplicateResponseDto::new(sensitivity, groups)))
}
