// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::crawl_use_case::CrawlUseCase;
use crate::domain::repositories::trademark_repository::TrademarkRepository;
use crate::domain::services::brand_count_service::BrandCountService;
use crate::domain::services::lookup_service::LookupService;
use crate::engines::health_monitor::HealthCheck;
use crate::presentation::handlers::{
    attorney_handler, crawl_handler, duplicate_handler, health_handler, lookup_handler,
    trademark_handler,
};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 处理器依赖的服务集合
#[derive(Clone)]
pub struct AppServices {
    pub crawl: Arc<CrawlUseCase>,
    pub lookup: Arc<LookupService>,
    pub health: Arc<dyn HealthCheck>,
    pub trademarks: Arc<TrademarkRepository>,
    pub brand_counts: Arc<BrandCountService>,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route("/v1/registry/health", get(health_handler::registry_health))
        .route("/v1/crawl", post(crawl_handler::create_crawl))
        .route("/v1/crawl/resume", get(crawl_handler::resume_crawl))
        .route("/v1/crawl/{job_id}", get(crawl_handler::get_crawl))
        .route("/v1/crawl/{job_id}/stop", post(crawl_handler::stop_crawl))
        .route("/v1/lookup", post(lookup_handler::lookup))
        .route("/v1/trademarks", get(trademark_handler::recent_trademarks))
        .route("/v1/duplicates", post(duplicate_handler::find_duplicates))
        .route(
            "/v1/attorneys/brand-counts",
            post(attorney_handler::refresh_brand_counts),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 创建带有服务依赖和请求追踪的完整应用
pub fn app(services: AppServices) -> Router {
    routes()
        .layer(Extension(services.crawl))
        .layer(Extension(services.lookup))
        .layer(Extension(services.health))
        .layer(Extension(services.trademarks))
        .layer(Extension(services.brand_counts))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
