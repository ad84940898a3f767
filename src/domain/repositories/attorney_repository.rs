// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::document_store::{DocumentStore, OrderBy, RepositoryError, SortDirection, ATTORNEYS};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// 代理人索引中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttorneyEntry {
    /// 文档键
    pub key: String,
    /// 代理人姓名
    pub name: String,
}

/// 代理人仓库
///
/// 读取爬取过程中建立的代理人索引，并写回商标数量统计结果
#[derive(Clone)]
pub struct AttorneyRepository {
    store: Arc<dyn DocumentStore>,
}

impl AttorneyRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 按首次收录顺序列出代理人
    ///
    /// 文档中没有姓名时用键还原（下划线换回空格）
    pub async fn list(&self, limit: u64) -> Result<Vec<AttorneyEntry>, RepositoryError> {
        let docs = self
            .store
            .query(ATTORNEYS, OrderBy::CreatedAt, SortDirection::Ascending, limit)
            .await?;

        Ok(docs
            .into_iter()
            .map(|doc| {
                let name = doc
                    .data
                    .get("name")
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| doc.key.replace('_', " "));
                AttorneyEntry { key: doc.key, name }
            })
            .collect())
    }

    /// 合并写入商标数量和统计时间，保留索引中的其他字段
    pub async fn record_brand_count(&self, key: &str, count: u64) -> Result<(), RepositoryError> {
        let fields = json!({
            "brand_count": count,
            "last_scraped": Utc::now(),
        });
        self.store.set(ATTORNEYS, key, fields, true).await?;
        Ok(())
    }
}
