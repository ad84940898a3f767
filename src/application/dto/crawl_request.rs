// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::checkpoint::{CheckpointState, CrawlCheckpoint};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 启动爬取请求
///
/// 按申请号从 `range_start` 降序扫描到 `range_end`（均包含）。
/// 指定已有且未完成的 `job_id` 时继续该任务的检查点。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_range"))]
pub struct CrawlRequestDto {
    #[validate(range(min = 1))]
    pub range_start: u64,
    #[validate(range(min = 1))]
    pub range_end: u64,
    #[validate(length(min = 1, max = 128))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

fn validate_range(dto: &CrawlRequestDto) -> Result<(), ValidationError> {
    if dto.range_start < dto.range_end {
        let mut err = ValidationError::new("range_order");
        err.message = Some("range_start must be greater than or equal to range_end".into());
        return Err(err);
    }
    Ok(())
}

/// 爬取启动后的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStartedDto {
    pub job_id: String,
    pub range_start: u64,
    pub range_end: u64,
    /// 继续已有检查点时，本次开始查询的申请号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resumed_from: Option<u64>,
}

/// 检查点视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDto {
    pub job_id: String,
    pub state: CheckpointState,
    pub range_start: u64,
    pub range_end: u64,
    pub last_processed: u64,
    pub remaining: u64,
    pub total_processed: u64,
    pub total_successful: u64,
    pub total_not_found: u64,
    pub total_failed: u64,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub last_activity_at: chrono::DateTime<chrono::Utc>,
    /// 是否有运行中的工作器
    pub active: bool,
}

impl CheckpointDto {
    pub fn from_checkpoint(checkpoint: CrawlCheckpoint, active: bool) -> Self {
        Self {
            remaining: checkpoint.remaining(),
            job_id: checkpoint.job_id,
            state: checkpoint.state,
            range_start: checkpoint.range_start,
            range_end: checkpoint.range_end,
            last_processed: checkpoint.last_processed,
            total_processed: checkpoint.total_processed,
            total_successful: checkpoint.total_successful,
            total_not_found: checkpoint.total_not_found,
            total_failed: checkpoint.total_failed,
            started_at: checkpoint.started_at,
            last_activity_at: checkpoint.last_activity_at,
            active,
        }
    }
}

/// 恢复建议：最近一个可恢复的检查点以及预填好的启动请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSuggestionDto {
    pub checkpoint: CheckpointDto,
    pub request: CrawlRequestDto,
}
