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

use crate::config::settings::RegistrySettings;
use crate::domain::models::trademark::TrademarkRecord;
use crate::domain::services::record_extractor;
use crate::engines::session_manager::SessionManager;
use crate::engines::traits::{EngineError, RegistryQuery};
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, ORIGIN, REFERER};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// 构建访问注册处使用的HTTP客户端
///
/// 统一设置浏览器风格的请求头和单次请求超时
pub fn build_http_client(settings: &RegistrySettings) -> Result<reqwest::Client, EngineError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_str(&settings.accept)
            .map_err(|e| EngineError::Other(format!("Invalid accept header: {}", e)))?,
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&settings.accept_language)
            .map_err(|e| EngineError::Other(format!("Invalid accept-language header: {}", e)))?,
    );

    let mut builder = reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .timeout(settings.request_timeout());

    // Handle TLS verification
    if settings.skip_tls_verification {
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}

/// 注册处查询客户端
///
/// 组合会话管理器与表单 POST，把返回页面交给记录提取器
pub struct RegistryClient {
    client: reqwest::Client,
    sessions: Arc<SessionManager>,
    search_url: String,
    origin: String,
    expiry_markers: Vec<String>,
}

impl RegistryClient {
    pub fn new(
        client: reqwest::Client,
        sessions: Arc<SessionManager>,
        settings: &RegistrySettings,
    ) -> Self {
        let origin = Url::parse(&settings.search_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_default();

        Self {
            client,
            sessions,
            search_url: settings.search_url.clone(),
            origin,
            expiry_markers: settings.expiry_markers.clone(),
        }
    }

    fn is_expired(&self, body: &str) -> bool {
        self.expiry_markers
            .iter()
            .any(|marker| body.contains(marker.as_str()))
    }
}

fn record_outcome(outcome: &'static str) {
    counter!("registry_queries_total", "outcome" => outcome).increment(1);
}

#[async_trait]
impl RegistryQuery for RegistryClient {
    /// 查询一条记录
    ///
    /// # 参数
    ///
    /// * `application_number` - 申请号
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(TrademarkRecord))` - 找到记录
    /// * `Ok(None)` - 没有数据，或会话已过期（会话已被作废）
    /// * `Err(EngineError)` - 会话不可用、传输失败或状态码异常
    #[instrument(skip(self))]
    async fn fetch(
        &self,
        application_number: &str,
    ) -> Result<Option<TrademarkRecord>, EngineError> {
        let Some(session) = self.sessions.get_session().await else {
            record_outcome("session_unavailable");
            return Err(EngineError::SessionUnavailable);
        };

        let form = [
            ("frmBsqExp", "frmBsqExp"),
            ("frmBsqExp:expedienteId", application_number),
            ("frmBsqExp:busquedaId2", ""),
            ("javax.faces.ViewState", session.view_state.as_str()),
        ];

        let mut request = self
            .client
            .post(&self.search_url)
            .form(&form)
            .header(REFERER, &self.search_url)
            .header(ORIGIN, &self.origin);
        if !session.cookie_header.is_empty() {
            request = request.header(COOKIE, &session.cookie_header);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = EngineError::from(e);
                record_outcome(if matches!(err, EngineError::Timeout) {
                    "timeout"
                } else {
                    "error"
                });
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            record_outcome("error");
            return Err(EngineError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await?;

        if self.is_expired(&body) {
            warn!("Portal session expired while querying {}", application_number);
            self.sessions.invalidate().await;
            record_outcome("expired");
            return Ok(None);
        }

        match record_extractor::extract(&body) {
            Some(mut record) => {
                record.application_number = application_number.to_string();
                record_outcome("found");
                Ok(Some(record))
            }
            None => {
                debug!("No record data for {}", application_number);
                record_outcome("not_found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_client_test.rs"]
mod tests;
