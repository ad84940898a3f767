// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::document_store::{
    merge_json, Document, DocumentStore, OrderBy, RepositoryError, SortDirection,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// 内存文档存储
///
/// 用于测试以及 `storage_type = "memory"` 的部署，进程退出后数据丢失
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: DashMap<(String, String), Document>,
    unavailable: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储故障，关闭后所有操作都返回 `Unavailable`
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// 集合中的文档数量
    pub fn count(&self, collection: &str) -> usize {
        self.documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count()
    }

    fn ensure_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, RepositoryError> {
        self.ensure_available()?;
        Ok(self
            .documents
            .get(&(collection.to_string(), key.to_string()))
            .map(|doc| doc.value().clone()))
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<Document, RepositoryError> {
        self.ensure_available()?;
        let now = Utc::now();

        let mut entry = self
            .documents
            .entry((collection.to_string(), key.to_string()))
            .or_insert_with(|| Document {
                key: key.to_string(),
                data: Value::Object(Map::new()),
                created_at: now,
                updated_at: now,
            });

        if merge {
            merge_json(&mut entry.data, fields);
        } else {
            entry.data = fields;
        }
        entry.updated_at = now;

        Ok(entry.value().clone())
    }

    async fn query(
        &self,
        collection: &str,
        order_by: OrderBy,
        direction: SortDirection,
        limit: u64,
    ) -> Result<Vec<Document>, RepositoryError> {
        self.ensure_available()?;

        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| entry.value().clone())
            .collect();

        docs.sort_by(|a, b| {
            let ordering = match order_by {
                OrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
                OrderBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            }
            .then_with(|| a.key.cmp(&b.key));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        docs.truncate(limit as usize);

        Ok(docs)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.ensure_available()
    }
}
