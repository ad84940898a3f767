// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::domain::repositories::document_store::DocumentStore;
use crate::engines::session_manager::SessionManager;

/// 健康检查结果
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthReport {
    /// 能否获取门户会话
    pub session: bool,
    /// 文档存储是否可达
    pub store: bool,
    /// 检查时间
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.session && self.store
    }
}

/// 健康检查特质
///
/// 爬取循环在连续错误后用它判断上游是否恢复
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// 执行一次检查
    async fn check(&self) -> HealthReport;
}

/// 注册处健康监控器
///
/// 独立获取一次门户会话（不影响爬取使用的缓存会话），并检查文档存储的可达性
pub struct RegistryHealthMonitor {
    sessions: Arc<SessionManager>,
    store: Arc<dyn DocumentStore>,
}

impl RegistryHealthMonitor {
    /// 创建新的健康监控器
    pub fn new(sessions: Arc<SessionManager>, store: Arc<dyn DocumentStore>) -> Self {
        Self { sessions, store }
    }
}

#[async_trait]
impl HealthCheck for RegistryHealthMonitor {
    async fn check(&self) -> HealthReport {
        let session = self.sessions.check_portal().await;

        let store = match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Document store health check failed: {}", e);
                false
            }
        };

        HealthReport {
            session,
            store,
            checked_at: Utc::now(),
        }
    }
}
