// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::document_store::{
    DocumentStore, OrderBy, RepositoryError, SortDirection, ATTORNEYS, TRADEMARKS,
};
use crate::domain::models::trademark::{RecordSource, TrademarkRecord};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

/// 商标记录仓库
///
/// 在通用文档存储之上提供按申请号读写商标记录的类型化接口，
/// 同时维护代理人索引集合。
#[derive(Clone)]
pub struct TrademarkRepository {
    store: Arc<dyn DocumentStore>,
}

impl TrademarkRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 按申请号读取已保存的记录，读取到的记录标记为缓存来源
    pub async fn find(
        &self,
        application_number: &str,
    ) -> Result<Option<TrademarkRecord>, RepositoryError> {
        let Some(doc) = self.store.get(TRADEMARKS, application_number).await? else {
            return Ok(None);
        };

        let mut record: TrademarkRecord = serde_json::from_value(doc.data)?;
        if record.application_number.is_empty() {
            record.application_number = application_number.to_string();
        }
        Ok(Some(record.with_source(RecordSource::Cache)))
    }

    /// 保存一条爬取到的记录
    ///
    /// 以申请号为键整体写入，附带保存时间和数值形式的申请号。
    /// 同一键的重复爬取直接覆盖。
    pub async fn create(&self, record: &TrademarkRecord) -> Result<(), RepositoryError> {
        let mut data = serde_json::to_value(record)?;
        if let Value::Object(map) = &mut data {
            map.remove("source");
            map.insert("saved_at".to_string(), json!(Utc::now()));
            if let Ok(numeric) = record.application_number.parse::<u64>() {
                map.insert("application_number_numeric".to_string(), json!(numeric));
            }
        }

        self.store
            .set(TRADEMARKS, &record.application_number, data, false)
            .await?;
        Ok(())
    }

    /// 最近保存的记录
    pub async fn recent(&self, limit: u64) -> Result<Vec<TrademarkRecord>, RepositoryError> {
        let docs = self
            .store
            .query(TRADEMARKS, OrderBy::UpdatedAt, SortDirection::Descending, limit)
            .await?;

        docs.into_iter()
            .map(|doc| {
                serde_json::from_value::<TrademarkRecord>(doc.data)
                    .map(|r| r.with_source(RecordSource::Cache))
                    .map_err(RepositoryError::from)
            })
            .collect()
    }

    /// 更新代理人索引
    ///
    /// 以代理人姓名为键合并写入联系方式、最近出现时间
    /// 以及去重后的申请号列表。记录没有代理人姓名时不做任何事。
    pub async fn index_attorney(&self, record: &TrademarkRecord) -> Result<(), RepositoryError> {
        let attorney = &record.attorney;
        let Some(key) = attorney_key(&attorney.name) else {
            return Ok(());
        };

        let mut applications: Vec<String> = match self.store.get(ATTORNEYS, &key).await? {
            Some(doc) => doc
                .data
                .get("applications")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !applications.contains(&record.application_number) {
            applications.push(record.application_number.clone());
        }

        let fields = json!({
            "name": attorney.name,
            "address": attorney.address,
            "city": attorney.city,
            "postal_code": attorney.postal_code,
            "country": attorney.country,
            "nationality": attorney.nationality,
            "email": attorney.email,
            "phone": attorney.phone,
            "last_seen": Utc::now(),
            "applications": applications,
        });

        self.store.set(ATTORNEYS, &key, fields, true).await?;
        Ok(())
    }
}

/// 代理人索引的文档键：大写姓名，空白替换为下划线
pub fn attorney_key(name: &str) -> Option<String> {
    let key = name
        .split_whitespace()
        .map(|part| part.replace('/', "_").to_uppercase())
        .collect::<Vec<_>>()
        .join("_");
    (!key.is_empty()).then_some(key)
}
