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

use crate::domain::repositories::document_store::{
    merge_json, Document, DocumentStore, OrderBy, RepositoryError, SortDirection,
};
use crate::infrastructure::database::entities::document as document_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde_json::Value;
use std::sync::Arc;

/// 基于 SeaORM 的文档存储实现
pub struct SeaOrmDocumentStore {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDocumentStore {
    /// 创建新的文档存储实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<document_entity::Model> for Document {
    fn from(m: document_entity::Model) -> Self {
        Document {
            key: m.document_key,
            data: m.data,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, RepositoryError> {
        let model = document_entity::Entity::find_by_id((collection.to_owned(), key.to_owned()))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Document::from))
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
        merge: bool,
    ) -> Result<Document, RepositoryError> {
        let now = Utc::now();
        let id = (collection.to_owned(), key.to_owned());
        let txn = self.db.begin().await?;

        let fresh = document_entity::ActiveModel {
            collection: Set(collection.to_owned()),
            document_key: Set(key.to_owned()),
            data: Set(fields.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = document_entity::Entity::insert(fresh)
            .on_conflict(
                OnConflict::columns([
                    document_entity::Column::Collection,
                    document_entity::Column::DocumentKey,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        // 已存在的文档在行锁下读改写，并发合并不会丢失字段
        let existing = document_entity::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let model = if inserted > 0 {
            existing
        } else {
            let data = if merge {
                let mut data = existing.data.clone();
                merge_json(&mut data, fields);
                data
            } else {
                fields
            };

            let mut active: document_entity::ActiveModel = existing.into();
            active.data = Set(data);
            active.updated_at = Set(now.into());
            active.update(&txn).await?
        };

        txn.commit().await?;
        Ok(model.into())
    }

    async fn query(
        &self,
        collection: &str,
        order_by: OrderBy,
        direction: SortDirection,
        limit: u64,
    ) -> Result<Vec<Document>, RepositoryError> {
        let column = match order_by {
            OrderBy::CreatedAt => document_entity::Column::CreatedAt,
            OrderBy::UpdatedAt => document_entity::Column::UpdatedAt,
        };
        let order = match direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };

        let models = document_entity::Entity::find()
            .filter(document_entity::Column::Collection.eq(collection))
            .order_by(column, order.clone())
            .order_by(document_entity::Column::DocumentKey, order)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Document::from).collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.db.ping().await?;
        Ok(())
    }
}
