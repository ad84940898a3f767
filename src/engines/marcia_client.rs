// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MarciaSettings;
use crate::engines::traits::{AgentBrandCount, EngineError};
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{HeaderValue, ACCEPT};
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// 结构化检索的结果计数接口
pub const COUNT_PATH: &str = "/marcas/search/internal/result/count";

/// MARCIA 检索客户端
///
/// 只使用结果计数接口，按代理人姓名统计商标数量
pub struct MarciaClient {
    client: reqwest::Client,
    count_url: String,
}

impl MarciaClient {
    pub fn new(client: reqwest::Client, settings: &MarciaSettings) -> Self {
        Self {
            client,
            count_url: format!("{}{}", settings.base_url.trim_end_matches('/'), COUNT_PATH),
        }
    }
}

/// 按代理人姓名的结构化检索条件，其余条件全部留空
pub fn agent_search(agent_name: &str) -> Value {
    json!({
        "_type": "Search$Structured",
        "query": {
            "number": null,
            "classes": null,
            "codes": null,
            "title": null,
            "titleOption": null,
            "goodsAndServices": null,
            "name": {
                "name": agent_name,
                "types": ["AGENT"],
            },
            "date": null,
            "indicators": null,
            "status": null,
            "markType": null,
            "appType": null,
            "wordSet": null,
        },
        "images": [],
    })
}

/// 解析计数响应
///
/// 响应体本身是数字时直接使用，否则依次取非零的 `count`、`total`，都没有时为 0
pub fn parse_count(body: &Value) -> u64 {
    if body.is_number() {
        return as_count(body);
    }
    ["count", "total"]
        .iter()
        .filter_map(|field| body.get(field))
        .map(as_count)
        .find(|count| *count > 0)
        .unwrap_or(0)
}

fn as_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n > 0.0).map(|n| n as u64))
        .unwrap_or(0)
}

#[async_trait]
impl AgentBrandCount for MarciaClient {
    #[instrument(skip(self))]
    async fn brand_count(&self, agent_name: &str) -> Result<u64, EngineError> {
        let request = self
            .client
            .post(&self.count_url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&agent_search(agent_name));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                counter!("marcia_count_requests_total", "outcome" => "error").increment(1);
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            counter!("marcia_count_requests_total", "outcome" => "bad_status").increment(1);
            return Err(EngineError::UnexpectedStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let count = parse_count(&body);
        counter!("marcia_count_requests_total", "outcome" => "ok").increment(1);
        debug!("{} brands for agent {}", count, agent_name);
        Ok(count)
    }
}
