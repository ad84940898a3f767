// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 批量爬取检查点
///
/// 每个爬取任务对应一个检查点文档（以 `job_id` 为键），
/// 记录按申请号降序扫描的进度与统计，用于中断后恢复。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlCheckpoint {
    /// 任务唯一标识
    pub job_id: String,
    /// 起始申请号（较大值）
    pub range_start: u64,
    /// 结束申请号（较小值，包含）
    pub range_end: u64,
    /// 恢复时的起点（包含）
    pub last_processed: u64,
    /// 任务状态
    pub state: CheckpointState,
    pub total_processed: u64,
    pub total_successful: u64,
    pub total_not_found: u64,
    pub total_failed: u64,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl CrawlCheckpoint {
    /// 恢复时下一次查询的申请号
    pub fn resume_start(&self) -> u64 {
        self.last_processed
    }

    /// 尚未处理的申请号数量（估算）
    pub fn remaining(&self) -> u64 {
        if self.state == CheckpointState::Completed || self.last_processed < self.range_end {
            return 0;
        }
        self.last_processed - self.range_end + 1
    }
}

/// 检查点状态
///
/// 状态转换：Running → Paused/Completed/Error，Paused 不会自动恢复
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointState {
    /// 运行中
    #[default]
    Running,
    /// 已暂停
    Paused,
    /// 已完成
    Completed,
    /// 致命错误
    Error,
}

impl CheckpointState {
    /// 是否可以恢复（运行中说明进程曾被中断）
    pub fn is_resumable(&self) -> bool {
        matches!(self, CheckpointState::Running | CheckpointState::Paused)
    }
}

impl fmt::Display for CheckpointState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CheckpointState::Running => write!(f, "running"),
            CheckpointState::Paused => write!(f, "paused"),
            CheckpointState::Completed => write!(f, "completed"),
            CheckpointState::Error => write!(f, "error"),
        }
    }
}

/// 检查点的部分更新
///
/// 序列化时省略未设置的字段，作为合并写入的补丁使用
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckpointUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_processed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<CheckpointState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_processed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_successful: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_not_found: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_failed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}
