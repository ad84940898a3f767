// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlSettings;
use crate::domain::models::checkpoint::CrawlCheckpoint;
use crate::domain::repositories::checkpoint_repository::CheckpointRepository;
use crate::domain::repositories::trademark_repository::TrademarkRepository;
use crate::engines::health_monitor::HealthCheck;
use crate::engines::traits::RegistryQuery;
use crate::workers::crawl_worker::{CrawlJob, CrawlWorker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

/// 爬取管理器错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ManagerError {
    #[error("Crawl job {0} is already running")]
    AlreadyRunning(String),
}

struct ActiveJob {
    job_id: String,
    cancel: Arc<AtomicBool>,
}

/// 爬取管理器
///
/// 注册处门户是有状态的单会话应用，同一时间只允许运行一个爬取任务
pub struct CrawlManager {
    registry: Arc<dyn RegistryQuery>,
    health: Arc<dyn HealthCheck>,
    trademarks: TrademarkRepository,
    checkpoints: CheckpointRepository,
    settings: CrawlSettings,
    active: Arc<Mutex<Option<ActiveJob>>>,
}

impl CrawlManager {
    pub fn new(
        registry: Arc<dyn RegistryQuery>,
        health: Arc<dyn HealthCheck>,
        trademarks: TrademarkRepository,
        checkpoints: CheckpointRepository,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            registry,
            health,
            trademarks,
            checkpoints,
            settings,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// 在后台启动爬取任务
    ///
    /// # 参数
    ///
    /// * `job` - 任务参数
    /// * `resume_from` - 要继续的检查点
    ///
    /// # 返回值
    ///
    /// * `Ok(JoinHandle)` - 任务结束时得到最终检查点
    /// * `Err(ManagerError::AlreadyRunning)` - 已有任务在运行
    pub fn start(
        &self,
        job: CrawlJob,
        resume_from: Option<CrawlCheckpoint>,
    ) -> Result<JoinHandle<CrawlCheckpoint>, ManagerError> {
        let cancel = Arc::new(AtomicBool::new(false));
        {
            let mut active = lock(&self.active);
            if let Some(current) = active.as_ref() {
                return Err(ManagerError::AlreadyRunning(current.job_id.clone()));
            }
            *active = Some(ActiveJob {
                job_id: job.job_id.clone(),
                cancel: cancel.clone(),
            });
        }

        let worker = CrawlWorker::new(
            self.registry.clone(),
            self.health.clone(),
            self.trademarks.clone(),
            self.checkpoints.clone(),
            self.settings.clone(),
            cancel,
        );
        let active = self.active.clone();

        info!("Starting crawl job {}", job.job_id);
        Ok(tokio::spawn(async move {
            let result = worker.run(&job, resume_from).await;
            let mut slot = lock(&active);
            if slot.as_ref().is_some_and(|a| a.job_id == job.job_id) {
                *slot = None;
            }
            info!("Crawl job {} finished as {}", job.job_id, result.state);
            result
        }))
    }

    /// 请求停止任务，返回该任务是否正在运行
    pub fn stop(&self, job_id: &str) -> bool {
        match lock(&self.active).as_ref() {
            Some(active) if active.job_id == job_id => {
                active.cancel.store(true, Ordering::SeqCst);
                info!("Stop requested for crawl job {}", job_id);
                true
            }
            _ => false,
        }
    }

    /// 当前运行中的任务 ID
    pub fn active_job(&self) -> Option<String> {
        lock(&self.active).as_ref().map(|a| a.job_id.clone())
    }

    /// 等待当前任务结束，超过 `limit` 返回 false
    pub async fn wait_idle(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, async {
            while self.active_job().is_some() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        })
        .await
        .is_ok()
    }
}

fn lock(active: &Mutex<Option<ActiveJob>>) -> MutexGuard<'_, Option<ActiveJob>> {
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
