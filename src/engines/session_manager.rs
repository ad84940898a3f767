// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RegistrySettings;
use crate::domain::models::session::PortalSession;
use crate::engines::traits::EngineError;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

static VIEW_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)javax\.faces\.ViewState.*?value="([^"]+)""#).unwrap()
});

/// 门户会话管理器
///
/// 持有进程内唯一的会话缓存。缓存由互斥锁保护，
/// 并发调用方在会话过期时只会触发一次获取。
pub struct SessionManager {
    client: reqwest::Client,
    search_url: String,
    ttl: Duration,
    cached: Mutex<Option<PortalSession>>,
}

impl SessionManager {
    /// 创建新的会话管理器
    ///
    /// # 参数
    ///
    /// * `client` - 共享的HTTP客户端
    /// * `settings` - 注册处配置
    pub fn new(client: reqwest::Client, settings: &RegistrySettings) -> Self {
        Self {
            client,
            search_url: settings.search_url.clone(),
            ttl: settings.session_ttl(),
            cached: Mutex::new(None),
        }
    }

    /// 获取可用会话
    ///
    /// 缓存的会话仍在有效期内时直接返回，不发起网络请求；
    /// 否则重新获取并覆盖缓存。获取失败时返回 `None`，不做内部重试。
    pub async fn get_session(&self) -> Option<PortalSession> {
        let mut cached = self.cached.lock().await;

        if let Some(session) = cached.as_ref() {
            if session.is_fresh(self.ttl) {
                return Some(session.clone());
            }
            debug!("Portal session expired, acquiring a new one");
        }

        match self.acquire().await {
            Ok(session) => {
                counter!("registry_sessions_acquired_total").increment(1);
                info!("Acquired new portal session");
                *cached = Some(session.clone());
                Some(session)
            }
            Err(e) => {
                warn!("Failed to acquire portal session: {}", e);
                None
            }
        }
    }

    /// 作废缓存的会话，下次调用 `get_session` 时重新获取
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            info!("Portal session invalidated");
        }
    }

    /// 独立获取一次会话以检查门户是否可用
    ///
    /// 不读取也不替换缓存，正在使用缓存会话的爬取不受影响
    pub async fn check_portal(&self) -> bool {
        match self.acquire().await {
            Ok(_) => true,
            Err(e) => {
                warn!("Portal session check failed: {}", e);
                false
            }
        }
    }

    async fn acquire(&self) -> Result<PortalSession, EngineError> {
        let url = Url::parse(&self.search_url)
            .map_err(|e| EngineError::Other(format!("Invalid search url: {}", e)))?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::UnexpectedStatus(status.as_u16()));
        }

        let cookie_header = session_cookies(&url, response.headers());
        let body = response.text().await?;
        let view_state = extract_view_state(&body)
            .ok_or_else(|| EngineError::Other("view state marker not found".to_string()))?;

        Ok(PortalSession::new(view_state, cookie_header))
    }
}

/// 从页面中提取 JSF 视图状态令牌
pub fn extract_view_state(html: &str) -> Option<String> {
    VIEW_STATE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 把响应中的 Set-Cookie 转成对 `url` 有效的 Cookie 请求头
///
/// 每次获取会话都使用新的 cookie jar，旧会话的 cookie 不会带入新会话
pub fn session_cookies(url: &Url, headers: &HeaderMap) -> String {
    let jar = Jar::default();
    jar.set_cookies(&mut headers.get_all(SET_COOKIE).iter(), url);
    jar.cookies(url)
        .and_then(|value| value.to_str().ok().map(str::to_string))
        .unwrap_or_default()
}
