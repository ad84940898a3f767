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

use crate::domain::models::trademark::TrademarkRecord;
use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(reqwest::Error),
    /// 无法获取门户会话
    #[error("Portal session unavailable")]
    SessionUnavailable,
    /// 非预期的HTTP状态码
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),
    /// 请求超过 `request_timeout_secs`
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Timeout
        } else {
            EngineError::RequestFailed(err)
        }
    }
}

/// 注册处查询特质
///
/// 按申请号查询一条记录。爬取循环使用 `fetch` 区分传输错误与未找到；
/// 交互查询使用 `query`，所有失败都折叠为 `None`。
#[async_trait]
pub trait RegistryQuery: Send + Sync {
    /// 查询一条记录
    ///
    /// # 参数
    ///
    /// * `application_number` - 申请号
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(TrademarkRecord))` - 找到记录，申请号已回填
    /// * `Ok(None)` - 页面中没有数据，或会话已过期
    /// * `Err(EngineError)` - 会话不可用或请求失败
    async fn fetch(&self, application_number: &str)
        -> Result<Option<TrademarkRecord>, EngineError>;

    /// 查询一条记录，错误折叠为 `None`
    async fn query(&self, application_number: &str) -> Option<TrademarkRecord> {
        match self.fetch(application_number).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Registry query for {} failed: {}", application_number, e);
                None
            }
        }
    }
}

/// 代理人商标数量统计特质
#[async_trait]
pub trait AgentBrandCount: Send + Sync {
    /// 统计以 `agent_name` 为代理人的商标数量
    async fn brand_count(&self, agent_name: &str) -> Result<u64, EngineError>;
}
