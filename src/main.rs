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

use acervors::application::use_cases::crawl_use_case::CrawlUseCase;
use acervors::config::settings::Settings;
use acervors::domain::repositories::attorney_repository::AttorneyRepository;
use acervors::domain::repositories::checkpoint_repository::CheckpointRepository;
use acervors::domain::repositories::document_store::DocumentStore;
use acervors::domain::repositories::trademark_repository::TrademarkRepository;
use acervors::domain::services::brand_count_service::BrandCountService;
use acervors::domain::services::lookup_service::LookupService;
use acervors::engines::health_monitor::{HealthCheck, RegistryHealthMonitor};
use acervors::engines::marcia_client::MarciaClient;
use acervors::engines::registry_client::{build_http_client, RegistryClient};
use acervors::engines::session_manager::SessionManager;
use acervors::engines::traits::RegistryQuery;
use acervors::infrastructure::database::connection;
use acervors::infrastructure::metrics::init_metrics;
use acervors::infrastructure::repositories::document_store_impl::SeaOrmDocumentStore;
use acervors::infrastructure::repositories::memory_store::MemoryDocumentStore;
use acervors::presentation::routes::{self, AppServices};
use acervors::utils::telemetry;
use acervors::workers::manager::CrawlManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting acervors...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    init_metrics(&settings.metrics);

    // 3. Document store
    let store: Arc<dyn DocumentStore> = match settings.storage.storage_type.as_str() {
        "memory" => {
            warn!("Using in-memory document store, data is lost on exit");
            Arc::new(MemoryDocumentStore::new())
        }
        _ => {
            let db = connection::connect(&settings.database).await?;
            info!("Database connection established");
            Arc::new(SeaOrmDocumentStore::new(Arc::new(db)))
        }
    };
    let trademarks = TrademarkRepository::new(store.clone());
    let checkpoints = CheckpointRepository::new(store.clone());
    let attorneys = AttorneyRepository::new(store.clone());

    // 4. Registry client
    let http_client = build_http_client(&settings.registry)?;
    let sessions = Arc::new(SessionManager::new(http_client.clone(), &settings.registry));
    let registry: Arc<dyn RegistryQuery> = Arc::new(RegistryClient::new(
        http_client.clone(),
        sessions.clone(),
        &settings.registry,
    ));
    let health: Arc<dyn HealthCheck> = Arc::new(RegistryHealthMonitor::new(sessions, store));

    // 5. Crawl manager and use cases
    let manager = Arc::new(CrawlManager::new(
        registry.clone(),
        health.clone(),
        trademarks.clone(),
        checkpoints.clone(),
        settings.crawl.clone(),
    ));
    let crawl_use_case = Arc::new(CrawlUseCase::new(manager.clone(), checkpoints));
    let lookup = Arc::new(LookupService::new(
        trademarks.clone(),
        registry,
        &settings.lookup,
    ));
    let brand_counts = Arc::new(BrandCountService::new(
        attorneys,
        Arc::new(MarciaClient::new(http_client, &settings.marcia)),
        &settings.marcia,
    ));

    // 6. Report an interrupted crawl, it is never resumed automatically
    match crawl_use_case.resume_suggestion().await {
        Ok(Some(suggestion)) => info!(
            "Crawl {} can be resumed from {} down to {} ({} processed so far)",
            suggestion.checkpoint.job_id,
            suggestion.request.range_start,
            suggestion.request.range_end,
            suggestion.checkpoint.total_processed
        ),
        Ok(None) => info!("No resumable crawl found"),
        Err(e) => error!("Failed to read crawl checkpoints: {}", e),
    }

    // 7. Start HTTP server
    let app = routes::app(AppServices {
        crawl: crawl_use_case,
        lookup,
        health,
        trademarks: Arc::new(trademarks),
        brand_counts,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(manager.clone()))
        .await?;

    if !manager.wait_idle(Duration::from_secs(60)).await {
        warn!("Crawl did not pause in time, its checkpoint may lag behind");
    }
    info!("Shut down");

    Ok(())
}

/// 等待关闭信号，并让正在运行的爬取写入暂停检查点
async fn shutdown_signal(manager: Arc<CrawlManager>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }

    if let Some(job_id) = manager.active_job() {
        manager.stop(&job_id);
        info!("Crawl {} asked to pause before shutdown", job_id);
    }
}
