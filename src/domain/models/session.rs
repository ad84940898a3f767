// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tokio::time::Instant;

/// 注册处门户会话
///
/// 由 JSF 视图状态令牌和 Cookie 请求头组成。只存在于进程内存中，
/// 超过 TTL 或收到失效信号后作废，下次使用时重新获取。
#[derive(Debug, Clone)]
pub struct PortalSession {
    /// javax.faces.ViewState 隐藏字段的值
    pub view_state: String,
    /// 合并后的 Cookie 请求头
    pub cookie_header: String,
    /// 获取时间
    pub acquired_at: Instant,
}

impl PortalSession {
    pub fn new(view_state: impl Into<String>, cookie_header: impl Into<String>) -> Self {
        Self {
            view_state: view_state.into(),
            cookie_header: cookie_header.into(),
            acquired_at: Instant::now(),
        }
    }

    /// 会话是否仍在有效期内
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.acquired_at.elapsed() < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_ttl() {
        let session = PortalSession::new("vs", "JSESSIONID=1");
        let ttl = Duration::from_secs(60);

        assert!(session.is_fresh(ttl));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(session.is_fresh(ttl));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!session.is_fresh(ttl));
    }
}
