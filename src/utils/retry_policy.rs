// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlSettings;
use std::time::Duration;

/// 重试策略
///
/// 爬取循环在连续错误达到阈值后按该策略等待并探测上游健康状况，
/// 每次重试前等待相同时间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大重试次数
    pub max_retries: u32,
    /// 每次重试前的等待时间
    pub wait: Duration,
}

impl RetryPolicy {
    pub fn fixed(max_retries: u32, wait: Duration) -> Self {
        Self { max_retries, wait }
    }

    /// 爬取恢复策略：每次探测前等待 `recovery_wait_secs`，最多 `recovery_attempts` 次
    pub fn recovery(settings: &CrawlSettings) -> Self {
        Self::fixed(
            settings.recovery_attempts,
            Duration::from_secs(settings.recovery_wait_secs),
        )
    }

    /// 已经尝试 `attempt` 次后是否还应该重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}
