// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::document_store::{
    DocumentStore, OrderBy, RepositoryError, SortDirection, CRAWL_CHECKPOINTS,
};
use crate::domain::models::checkpoint::{CheckpointUpdate, CrawlCheckpoint};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

/// 爬取检查点仓库
///
/// 检查点始终以 `job_id` 为键合并写入，每次写入都会刷新 `last_activity_at`。
#[derive(Clone)]
pub struct CheckpointRepository {
    store: Arc<dyn DocumentStore>,
}

impl CheckpointRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 读取指定任务的检查点
    pub async fn load(&self, job_id: &str) -> Result<Option<CrawlCheckpoint>, RepositoryError> {
        match self.store.get(CRAWL_CHECKPOINTS, job_id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc.data)?)),
            None => Ok(None),
        }
    }

    /// 合并写入检查点的部分字段
    pub async fn save(&self, job_id: &str, update: &CheckpointUpdate) -> Result<(), RepositoryError> {
        let mut fields = serde_json::to_value(update)?;
        if let Value::Object(map) = &mut fields {
            map.insert("job_id".to_string(), json!(job_id));
            map.insert("last_activity_at".to_string(), json!(Utc::now()));
        }

        self.store
            .set(CRAWL_CHECKPOINTS, job_id, fields, true)
            .await?;
        Ok(())
    }

    /// 最近一次活动的检查点
    pub async fn latest(&self) -> Result<Option<CrawlCheckpoint>, RepositoryError> {
        let docs = self
            .store
            .query(CRAWL_CHECKPOINTS, OrderBy::UpdatedAt, SortDirection::Descending, 1)
            .await?;

        match docs.into_iter().next() {
            Some(doc) => Ok(Some(serde_json::from_value(doc.data)?)),
            None => Ok(None),
        }
    }

    /// 最近一次活动且可恢复（运行中或已暂停）的检查点
    pub async fn latest_resumable(&self) -> Result<Option<CrawlCheckpoint>, RepositoryError> {
        Ok(self
            .latest()
            .await?
            .filter(|checkpoint| checkpoint.state.is_resumable()))
    }
}
