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

use chrono::Utc;
use metrics::counter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::config::settings::CrawlSettings;
use crate::domain::models::checkpoint::{CheckpointState, CheckpointUpdate, CrawlCheckpoint};
use crate::domain::models::trademark::TrademarkRecord;
use crate::domain::repositories::checkpoint_repository::CheckpointRepository;
use crate::domain::repositories::trademark_repository::TrademarkRepository;
use crate::engines::health_monitor::HealthCheck;
use crate::engines::traits::RegistryQuery;
use crate::utils::retry_policy::RetryPolicy;

/// 一次批量爬取的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    pub job_id: String,
    /// 起始申请号（较大值，包含）
    pub range_start: u64,
    /// 结束申请号（较小值，包含）
    pub range_end: u64,
}

/// 恢复流程的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    /// 探测成功，继续爬取
    Recovered,
    /// 所有探测都失败
    Exhausted,
    /// 等待期间收到停止信号
    Cancelled,
}

/// 批量爬取工作器
///
/// 按申请号从大到小顺序查询注册处，每个任务只有一个顺序循环。
/// 找到的记录写入文档存储，进度定期以合并方式写入检查点。
/// 单个申请号的失败不会中断任务，只有连续错误且恢复失败才会终止。
pub struct CrawlWorker {
    registry: Arc<dyn RegistryQuery>,
    health: Arc<dyn HealthCheck>,
    trademarks: TrademarkRepository,
    checkpoints: CheckpointRepository,
    settings: CrawlSettings,
    cancel: Arc<AtomicBool>,
}

impl CrawlWorker {
    pub fn new(
        registry: Arc<dyn RegistryQuery>,
        health: Arc<dyn HealthCheck>,
        trademarks: TrademarkRepository,
        checkpoints: CheckpointRepository,
        settings: CrawlSettings,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            registry,
            health,
            trademarks,
            checkpoints,
            settings,
            cancel,
        }
    }

    /// 执行爬取直到完成、暂停或致命错误
    ///
    /// # 参数
    ///
    /// * `job` - 任务参数
    /// * `resume_from` - 要继续的检查点，从其 `last_processed`（包含）开始并沿用计数
    ///
    /// # 返回值
    ///
    /// 任务结束时的检查点（与最后一次写入的内容一致）
    #[instrument(skip(self, job, resume_from), fields(job_id = %job.job_id, range_start = job.range_start, range_end = job.range_end))]
    pub async fn run(&self, job: &CrawlJob, resume_from: Option<CrawlCheckpoint>) -> CrawlCheckpoint {
        let now = Utc::now();
        let mut progress = match resume_from {
            Some(checkpoint) => {
                info!(
                    "Resuming from {} (processed so far: {})",
                    checkpoint.last_processed, checkpoint.total_processed
                );
                CrawlCheckpoint {
                    job_id: job.job_id.clone(),
                    state: CheckpointState::Running,
                    ..checkpoint
                }
            }
            None => CrawlCheckpoint {
                job_id: job.job_id.clone(),
                range_start: job.range_start,
                range_end: job.range_end,
                last_processed: job.range_start,
                state: CheckpointState::Running,
                total_processed: 0,
                total_successful: 0,
                total_not_found: 0,
                total_failed: 0,
                started_at: now,
                last_activity_at: now,
            },
        };
        self.persist(&mut progress).await;

        let range_end = progress.range_end;
        let mut current = progress.last_processed;
        if current < range_end {
            return self.finish(progress, CheckpointState::Completed, range_end).await;
        }

        let threshold = self.settings.consecutive_error_threshold.max(1);
        let interval = self.settings.checkpoint_interval.max(1);
        let mut consecutive_errors: u32 = 0;
        let mut since_checkpoint: u64 = 0;

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                info!("Stop requested at {}", current);
                return self.finish(progress, CheckpointState::Paused, current).await;
            }

            let application_number = current.to_string();
            match self.registry.fetch(&application_number).await {
                Ok(outcome) => {
                    consecutive_errors = 0;
                    progress.total_processed += 1;
                    match outcome {
                        Some(record) if record.is_found() => {
                            progress.total_successful += 1;
                            self.save_record(&record).await;
                        }
                        _ => progress.total_not_found += 1,
                    }

                    since_checkpoint += 1;
                    if since_checkpoint >= interval {
                        since_checkpoint = 0;
                        progress.last_processed = current;
                        self.persist(&mut progress).await;
                        info!(
                            "Progress at {}: processed={} found={} not_found={} failed={}",
                            current,
                            progress.total_processed,
                            progress.total_successful,
                            progress.total_not_found,
                            progress.total_failed
                        );
                    }
                }
                Err(e) => {
                    progress.total_processed += 1;
                    progress.total_failed += 1;
                    consecutive_errors += 1;
                    warn!(
                        "Query for {} failed ({}/{} consecutive): {}",
                        application_number, consecutive_errors, threshold, e
                    );

                    if consecutive_errors >= threshold {
                        let resume_at = current.saturating_add(1).min(progress.range_start);
                        progress.state = CheckpointState::Paused;
                        progress.last_processed = resume_at;
                        self.persist(&mut progress).await;

                        match self.recover().await {
                            Recovery::Recovered => {
                                info!("Registry recovered, retrying {}", current);
                                consecutive_errors = 0;
                                progress.state = CheckpointState::Running;
                                self.persist(&mut progress).await;
                                continue;
                            }
                            Recovery::Exhausted => {
                                error!("Registry did not recover, aborting crawl");
                                return self
                                    .finish(progress, CheckpointState::Error, resume_at)
                                    .await;
                            }
                            Recovery::Cancelled => {
                                info!("Stop requested during recovery at {}", current);
                                return self
                                    .finish(progress, CheckpointState::Paused, current)
                                    .await;
                            }
                        }
                    }

                    if current == range_end {
                        break;
                    }
                    sleep(Duration::from_secs(self.settings.error_delay_secs)).await;
                    current -= 1;
                    continue;
                }
            }

            if current == range_end {
                break;
            }
            sleep(self.jitter()).await;
            current -= 1;
        }

        info!(
            "Crawl completed: processed={} found={} not_found={} failed={}",
            progress.total_processed,
            progress.total_successful,
            progress.total_not_found,
            progress.total_failed
        );
        self.finish(progress, CheckpointState::Completed, range_end).await
    }

    /// 连续错误后的恢复流程：等待后探测上游，最多探测 `recovery_attempts` 次
    async fn recover(&self) -> Recovery {
        let policy = RetryPolicy::recovery(&self.settings);
        let mut attempt = 0;

        while policy.should_retry(attempt) {
            attempt += 1;
            warn!(
                "Waiting {:?} before health check {}/{}",
                policy.wait, attempt, policy.max_retries
            );
            sleep(policy.wait).await;

            if self.cancel.load(Ordering::SeqCst) {
                return Recovery::Cancelled;
            }

            let report = self.health.check().await;
            if report.is_healthy() {
                return Recovery::Recovered;
            }
            warn!(
                "Health check {} failed (session: {}, store: {})",
                attempt, report.session, report.store
            );
        }

        Recovery::Exhausted
    }

    async fn save_record(&self, record: &TrademarkRecord) {
        if let Err(e) = self.trademarks.create(record).await {
            error!("Failed to save record {}: {}", record.application_number, e);
            return;
        }
        counter!("crawl_records_saved_total").increment(1);

        if let Err(e) = self.trademarks.index_attorney(record).await {
            error!(
                "Failed to index attorney for {}: {}",
                record.application_number, e
            );
        }
    }

    async fn finish(
        &self,
        mut progress: CrawlCheckpoint,
        state: CheckpointState,
        last_processed: u64,
    ) -> CrawlCheckpoint {
        progress.state = state;
        progress.last_processed = last_processed;
        self.persist(&mut progress).await;
        progress
    }

    /// 以合并方式写入完整进度，失败只记录日志
    async fn persist(&self, progress: &mut CrawlCheckpoint) {
        progress.last_activity_at = Utc::now();
        let update = CheckpointUpdate {
            range_start: Some(progress.range_start),
            range_end: Some(progress.range_end),
            last_processed: Some(progress.last_processed),
            state: Some(progress.state),
            total_processed: Some(progress.total_processed),
            total_successful: Some(progress.total_successful),
            total_not_found: Some(progress.total_not_found),
            total_failed: Some(progress.total_failed),
            started_at: Some(progress.started_at),
        };

        if let Err(e) = self.checkpoints.save(&progress.job_id, &update).await {
            error!("Failed to save checkpoint for {}: {}", progress.job_id, e);
        }
    }

    fn jitter(&self) -> Duration {
        let (min, max) = (self.settings.min_delay_ms, self.settings.max_delay_ms);
        let millis = if max > min {
            rand::random_range(min..max)
        } else {
            min
        };
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
#[path = "crawl_worker_test.rs"]
mod tests;
