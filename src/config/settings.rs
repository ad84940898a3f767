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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 注册处查询页面
pub const DEFAULT_SEARCH_URL: &str =
    "https://acervomarcas.impi.gob.mx:8181/marcanet/vistas/common/datos/bsqExpedienteCompleto.pgi";

/// MARCIA 检索服务地址
pub const DEFAULT_MARCIA_URL: &str = "https://marcia.impi.gob.mx";

/// 应用程序配置设置
///
/// 包含服务器、数据库、存储、指标、注册处、批量爬取、交互查询和代理人商标统计等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 注册处配置
    #[serde(default)]
    pub registry: RegistrySettings,
    /// 批量爬取配置
    #[serde(default)]
    pub crawl: CrawlSettings,
    /// 交互查询配置
    #[serde(default)]
    pub lookup: LookupSettings,
    /// 代理人商标数量统计配置
    #[serde(default)]
    pub marcia: MarciaSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (database, memory)
    pub storage_type: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_address: String,
}

/// 注册处配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// 查询页面URL（GET 获取会话，POST 查询）
    pub search_url: String,
    /// 会话有效期（秒）
    pub session_ttl_secs: u64,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// 响应中出现任一标记即视为会话过期
    pub expiry_markers: Vec<String>,
    /// 是否跳过TLS验证
    pub skip_tls_verification: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            session_ttl_secs: 60,
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "es-MX,es;q=0.9".to_string(),
            expiry_markers: vec![
                "ViewExpiredException".to_string(),
                "sesión ha expirado".to_string(),
            ],
            skip_tls_verification: false,
        }
    }
}

impl RegistrySettings {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 批量爬取配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// 每成功处理多少个申请号写一次检查点
    pub checkpoint_interval: u64,
    /// 随机间隔下限（毫秒，含）
    pub min_delay_ms: u64,
    /// 随机间隔上限（毫秒，不含）
    pub max_delay_ms: u64,
    /// 连续错误达到该值后暂停并进入恢复流程
    pub consecutive_error_threshold: u32,
    /// 普通错误后的等待时间（秒）
    pub error_delay_secs: u64,
    /// 每次恢复探测前的等待时间（秒）
    pub recovery_wait_secs: u64,
    /// 恢复探测次数
    pub recovery_attempts: u32,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            checkpoint_interval: 10,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            consecutive_error_threshold: 5,
            error_delay_secs: 10,
            recovery_wait_secs: 60,
            recovery_attempts: 3,
        }
    }
}

/// 交互查询配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// 批量查询时相邻两次查询之间的间隔（毫秒）
    pub pacing_ms: u64,
    /// 单个请求的总时长上限（秒）
    pub request_budget_secs: u64,
    /// 单个请求允许的最大申请号数量
    pub max_batch_size: usize,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            pacing_ms: 200,
            request_budget_secs: 300,
            max_batch_size: 100,
        }
    }
}

impl LookupSettings {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn request_budget(&self) -> Duration {
        Duration::from_secs(self.request_budget_secs)
    }
}

/// MARCIA 代理人商标数量统计配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarciaSettings {
    /// 服务根地址
    pub base_url: String,
    /// 相邻两次统计请求之间的间隔（毫秒）
    pub pacing_ms: u64,
    /// 单次批量统计最多处理的代理人数量
    pub max_attorneys: u64,
}

impl Default for MarciaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARCIA_URL.to_string(),
            pacing_ms: 3000,
            max_attorneys: 10_000,
        }
    }
}

impl MarciaSettings {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 和 `ACERVO__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ACERVO").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅包含内置默认值的配置构建器
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB settings
            .set_default("database.url", "sqlite://acervo.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Storage settings
            .set_default("storage.storage_type", "database")?
            // Default Metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_address", "0.0.0.0:9000")
    }

    /// 只使用内置默认值构建配置，不读取文件和环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
