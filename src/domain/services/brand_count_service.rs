// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MarciaSettings;
use crate::domain::repositories::attorney_repository::{AttorneyEntry, AttorneyRepository};
use crate::domain::repositories::document_store::RepositoryError;
use crate::engines::traits::AgentBrandCount;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// 单个代理人的统计结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandCountResult {
    pub key: String,
    pub name: String,
    pub brand_count: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 一次批量统计的汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandCountSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BrandCountResult>,
}

/// 代理人商标数量统计服务
///
/// 逐个查询代理人的商标数量，相邻两次查询之间固定间隔。
/// 查询失败的代理人记为 0 并标记失败，不中断批量统计。
pub struct BrandCountService {
    attorneys: AttorneyRepository,
    marcia: Arc<dyn AgentBrandCount>,
    pacing: Duration,
    max_attorneys: u64,
}

impl BrandCountService {
    pub fn new(
        attorneys: AttorneyRepository,
        marcia: Arc<dyn AgentBrandCount>,
        settings: &MarciaSettings,
    ) -> Self {
        Self {
            attorneys,
            marcia,
            pacing: settings.pacing(),
            max_attorneys: settings.max_attorneys,
        }
    }

    /// 查询一个代理人，失败折叠为数量 0
    pub async fn count_one(&self, attorney: &AttorneyEntry) -> BrandCountResult {
        match self.marcia.brand_count(&attorney.name).await {
            Ok(brand_count) => {
                counter!("attorney_brand_counts_total", "outcome" => "ok").increment(1);
                BrandCountResult {
                    key: attorney.key.clone(),
                    name: attorney.name.clone(),
                    brand_count,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                counter!("attorney_brand_counts_total", "outcome" => "failed").increment(1);
                warn!("Brand count for {} failed: {}", attorney.name, e);
                BrandCountResult {
                    key: attorney.key.clone(),
                    name: attorney.name.clone(),
                    brand_count: 0,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// 统计索引中的代理人并写回结果
    ///
    /// # 参数
    ///
    /// * `limit` - 最多处理的代理人数量，不超过配置上限
    ///
    /// # 返回值
    ///
    /// * `Ok(BrandCountSummary)` - 每个代理人一条结果，失败的也写回 0
    /// * `Err(RepositoryError)` - 读取索引或写回结果失败
    #[instrument(skip(self))]
    pub async fn refresh_all(
        &self,
        limit: Option<u64>,
    ) -> Result<BrandCountSummary, RepositoryError> {
        let limit = limit.map_or(self.max_attorneys, |l| l.min(self.max_attorneys));
        let attorneys = self.attorneys.list(limit).await?;
        let total = attorneys.len();
        info!("Counting brands for {} attorneys", total);

        let mut results = Vec::with_capacity(total);
        for (index, attorney) in attorneys.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing).await;
            }
            results.push(self.count_one(attorney).await);

            let done = index + 1;
            if done % 50 == 0 || done == total {
                info!("Brand counts: {}/{}", done, total);
            }
        }

        for result in &results {
            self.attorneys
                .record_brand_count(&result.key, result.brand_count)
                .await?;
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        Ok(BrandCountSummary {
            processed: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        })
    }
}
