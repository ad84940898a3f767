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

use crate::{
    application::dto::crawl_request::{
        CheckpointDto, CrawlRequestDto, CrawlStartedDto, ResumeSuggestionDto,
    },
    domain::{
        models::checkpoint::CheckpointState,
        repositories::{
            checkpoint_repository::CheckpointRepository, document_store::RepositoryError,
        },
    },
    workers::{
        crawl_worker::CrawlJob,
        manager::{CrawlManager, ManagerError},
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum CrawlUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Crawl not found")]
    NotFound,
    #[error("Crawl job {0} is not running")]
    NotRunning(String),
    #[error("Crawl job {0} is already running")]
    AlreadyRunning(String),
    #[error("Crawl job {0} has already completed")]
    AlreadyCompleted(String),
    #[error("Crawl job {job_id} ends at {expected}, not {requested}")]
    RangeMismatch {
        job_id: String,
        expected: u64,
        requested: u64,
    },
}

impl From<ManagerError> for CrawlUseCaseError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::AlreadyRunning(job_id) => CrawlUseCaseError::AlreadyRunning(job_id),
        }
    }
}

/// 批量爬取控制用例：启动、停止、查看和恢复建议
pub struct CrawlUseCase {
    manager: Arc<CrawlManager>,
    checkpoints: CheckpointRepository,
}

impl CrawlUseCase {
    pub fn new(manager: Arc<CrawlManager>, checkpoints: CheckpointRepository) -> Self {
        Self {
            manager,
            checkpoints,
        }
    }

    /// 启动爬取
    ///
    /// 请求中的 `job_id` 对应一个未完成的检查点且 `range_end` 一致时，
    /// 从检查点的 `last_processed` 继续（若请求的起点更小则从请求的起点继续），
    /// 统计数据沿用原检查点。
    pub async fn start(&self, dto: CrawlRequestDto) -> Result<CrawlStartedDto, CrawlUseCaseError> {
        dto.validate()
            .map_err(|e| CrawlUseCaseError::ValidationError(e.to_string()))?;

        let job_id = dto
            .job_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let existing = self.checkpoints.load(&job_id).await?;
        let (job, resume_from) = match existing {
            Some(checkpoint) if checkpoint.state == CheckpointState::Completed => {
                return Err(CrawlUseCaseError::AlreadyCompleted(job_id));
            }
            Some(checkpoint) if checkpoint.range_end != dto.range_end => {
                return Err(CrawlUseCaseError::RangeMismatch {
                    job_id,
                    expected: checkpoint.range_end,
                    requested: dto.range_end,
                });
            }
            Some(mut checkpoint) => {
                checkpoint.last_processed = checkpoint.last_processed.min(dto.range_start);
                let job = CrawlJob {
                    job_id: job_id.clone(),
                    range_start: checkpoint.range_start,
                    range_end: checkpoint.range_end,
                };
                (job, Some(checkpoint))
            }
            None => {
                let job = CrawlJob {
                    job_id: job_id.clone(),
                    range_start: dto.range_start,
                    range_end: dto.range_end,
                };
                (job, None)
            }
        };

        let resumed_from = resume_from.as_ref().map(|c| c.last_processed);
        let response = CrawlStartedDto {
            job_id: job.job_id.clone(),
            range_start: job.range_start,
            range_end: job.range_end,
            resumed_from,
        };

        // The handle is detached; progress is observed through the checkpoint.
        self.manager.start(job, resume_from)?;
        Ok(response)
    }

    /// 请求停止正在运行的任务
    pub fn stop(&self, job_id: &str) -> Result<(), CrawlUseCaseError> {
        if self.manager.stop(job_id) {
            Ok(())
        } else {
            Err(CrawlUseCaseError::NotRunning(job_id.to_string()))
        }
    }

    /// 读取任务的检查点
    pub async fn get(&self, job_id: &str) -> Result<CheckpointDto, CrawlUseCaseError> {
        let checkpoint = self
            .checkpoints
            .load(job_id)
            .await?
            .ok_or(CrawlUseCaseError::NotFound)?;
        let active = self.manager.active_job().as_deref() == Some(job_id);
        Ok(CheckpointDto::from_checkpoint(checkpoint, active))
    }

    /// 最近一个可恢复的检查点，并预填从 `last_processed` 开始的启动请求
    pub async fn resume_suggestion(&self) -> Result<Option<ResumeSuggestionDto>, CrawlUseCaseError> {
        let Some(checkpoint) = self.checkpoints.latest_resumable().await? else {
            return Ok(None);
        };

        info!(
            "Resumable crawl {} found at {}",
            checkpoint.job_id, checkpoint.last_processed
        );
        let request = CrawlRequestDto {
            range_start: checkpoint.resume_start(),
            range_end: checkpoint.range_end,
            job_id: Some(checkpoint.job_id.clone()),
        };
        let active = self.manager.active_job().as_deref() == Some(checkpoint.job_id.as_str());
        Ok(Some(ResumeSuggestionDto {
            checkpoint: CheckpointDto::from_checkpoint(checkpoint, active),
            request,
        }))
    }
}
