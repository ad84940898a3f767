// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde_json::Value;
use thiserror::Error;

/// 商标记录集合
pub const TRADEMARKS: &str = "trademarks";
/// 爬取检查点集合
pub const CRAWL_CHECKPOINTS: &str = "crawl_checkpoints";
/// 代理人索引集合
pub const ATTORNEYS: &str = "attorneys";

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 文档序列化或反序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储不可用
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// 存储中的一个文档
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 列表查询的排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    CreatedAt,
    UpdatedAt,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// 文档存储特质
///
/// 爬取流水线对持久化层的全部要求：按键读取、按键写入（支持合并）、
/// 有序列表以及可达性检查。每次写入都是单文档操作，不使用事务。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 按键读取文档
    ///
    /// # 参数
    ///
    /// * `collection` - 集合名称
    /// * `key` - 文档键
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(Document))` - 找到文档
    /// * `Ok(None)` - 文档不存在
    /// * `Err(RepositoryError)` - 读取失败
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, RepositoryError>;

    /// 按键写入文档
    ///
    /// # 参数
    ///
    /// * `collection` - 集合名称
    /// * `key` - 文档键
    /// * `fields` - 要写入的 JSON 对象
    /// * `merge` - 为 true 时与已有文档深度合并，否则整体替换
    ///
    /// # 返回值
    ///
    /// * `Ok(Document)` - 写入后的文档
    /// * `Err(RepositoryError)` - 写入失败
    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<Document, RepositoryError>;

    /// 有序列出集合中的文档
    async fn query(
        &self,
        collection: &str,
        order_by: OrderBy,
        direction: SortDirection,
        limit: u64,
    ) -> Result<Vec<Document>, RepositoryError>;

    /// 检查存储是否可达
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// 深度合并 JSON 对象
///
/// 对象按字段递归合并，其他类型（包括数组）直接以补丁值覆盖。
pub fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match target_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_json(existing, value)
                    }
                    _ => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}
