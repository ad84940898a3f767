// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::LookupSettings;
use crate::domain::models::trademark::{RecordSource, TrademarkRecord};
use crate::domain::repositories::trademark_repository::TrademarkRepository;
use crate::engines::traits::RegistryQuery;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 交互查询错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// 没有提供任何申请号
    #[error("At least one application number is required")]
    EmptyRequest,
    /// 申请号数量超过上限
    #[error("Too many application numbers: {0} (max {1})")]
    TooManyKeys(usize, usize),
    /// 超出请求总时长
    #[error("Lookup exceeded the request budget of {0:?}")]
    BudgetExceeded(Duration),
}

/// 双来源查询服务
///
/// 先读持久化存储，未命中或读取失败时再实时查询注册处，
/// 两者都没有结果时返回未找到记录。
pub struct LookupService {
    trademarks: TrademarkRepository,
    registry: Arc<dyn RegistryQuery>,
    pacing: Duration,
    budget: Duration,
    max_batch_size: usize,
}

impl LookupService {
    pub fn new(
        trademarks: TrademarkRepository,
        registry: Arc<dyn RegistryQuery>,
        settings: &LookupSettings,
    ) -> Self {
        Self {
            trademarks,
            registry,
            pacing: settings.pacing(),
            budget: settings.request_budget(),
            max_batch_size: settings.max_batch_size,
        }
    }

    /// 查询一个申请号，永不返回空
    pub async fn lookup(&self, application_number: &str) -> TrademarkRecord {
        match self.trademarks.find(application_number).await {
            Ok(Some(record)) => {
                counter!("lookup_requests_total", "source" => "cache").increment(1);
                debug!("Cache hit for {}", application_number);
                return record;
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read for {} failed: {}", application_number, e),
        }

        match self.registry.query(application_number).await {
            Some(record) => {
                counter!("lookup_requests_total", "source" => "live-scrape").increment(1);
                record.with_source(RecordSource::LiveScrape)
            }
            None => {
                counter!("lookup_requests_total", "source" => "not_found").increment(1);
                TrademarkRecord::not_found(application_number)
            }
        }
    }

    /// 按输入顺序逐个查询，多于一个时相邻查询之间固定间隔
    pub async fn lookup_many(&self, application_numbers: &[String]) -> Vec<TrademarkRecord> {
        let mut results = Vec::with_capacity(application_numbers.len());
        for (index, application_number) in application_numbers.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing).await;
            }
            results.push(self.lookup(application_number).await);
        }
        results
    }

    /// 在请求总时长内完成批量查询
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<TrademarkRecord>)` - 每个申请号一条结果，顺序与输入一致
    /// * `Err(LookupError)` - 输入为空、数量超限或超时
    pub async fn lookup_within_budget(
        &self,
        application_numbers: &[String],
    ) -> Result<Vec<TrademarkRecord>, LookupError> {
        if application_numbers.is_empty() {
            return Err(LookupError::EmptyRequest);
        }
        if application_numbers.len() > self.max_batch_size {
            return Err(LookupError::TooManyKeys(
                application_numbers.len(),
                self.max_batch_size,
            ));
        }

        tokio::time::timeout(self.budget, self.lookup_many(application_numbers))
            .await
            .map_err(|_| LookupError::BudgetExceeded(self.budget))
    }
}

#[cfg(test)]
#[path = "lookup_service_test.rs"]
mod tests;
