// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use acervors::application::use_cases::crawl_use_case::CrawlUseCase;
use acervors::config::settings::{CrawlSettings, LookupSettings, MarciaSettings, RegistrySettings};
use acervors::domain::repositories::attorney_repository::AttorneyRepository;
use acervors::domain::repositories::checkpoint_repository::CheckpointRepository;
use acervors::domain::repositories::trademark_repository::TrademarkRepository;
use acervors::domain::services::brand_count_service::BrandCountService;
use acervors::domain::services::lookup_service::LookupService;
use acervors::engines::health_monitor::{HealthCheck, RegistryHealthMonitor};
use acervors::engines::marcia_client::MarciaClient;
use acervors::engines::registry_client::{build_http_client, RegistryClient};
use acervors::engines::session_manager::SessionManager;
use acervors::engines::traits::RegistryQuery;
use acervors::infrastructure::repositories::memory_store::MemoryDocumentStore;
use acervors::presentation::routes::{self, AppServices};
use acervors::workers::manager::CrawlManager;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEARCH_PATH: &str = "/marcanet/vistas/common/datos/bsqExpedienteCompleto.pgi";
pub const RECORD_PAGE: &str = include_str!("../../fixtures/expediente_3544901.html");

const SEARCH_PAGE: &str = r#"<html><body><form id="frmBsqExp">
    <input type="hidden" name="javax.faces.ViewState" value="vs-test" />
    </form></body></html>"#;

const EMPTY_PAGE: &str = r#"<html><body><form id="frmBsqExp">
    <table><tr><td>No se encontraron resultados</td></tr></table>
    </form></body></html>"#;

/// 测试应用
///
/// 使用内存文档存储和 wiremock 模拟的注册处门户，MARCIA 计数接口也挂在同一个模拟服务上
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDocumentStore>,
    pub portal: MockServer,
    pub manager: Arc<CrawlManager>,
}

/// 创建测试应用，门户只提供会话页面，查询响应由各测试自行挂载
pub async fn create_test_app() -> TestApp {
    let portal = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "JSESSIONID=test; Path=/marcanet")
                .set_body_string(SEARCH_PAGE),
        )
        .mount(&portal)
        .await;

    let registry_settings = RegistrySettings {
        search_url: format!("{}{}", portal.uri(), SEARCH_PATH),
        ..Default::default()
    };
    // Keep real-time waits short, wiremock needs a running clock.
    let crawl_settings = CrawlSettings {
        min_delay_ms: 1,
        max_delay_ms: 5,
        error_delay_secs: 0,
        recovery_wait_secs: 0,
        ..Default::default()
    };
    let lookup_settings = LookupSettings {
        pacing_ms: 20,
        max_batch_size: 5,
        ..Default::default()
    };
    let marcia_settings = MarciaSettings {
        base_url: portal.uri(),
        pacing_ms: 10,
        ..Default::default()
    };

    let store = Arc::new(MemoryDocumentStore::new());
    let trademarks = TrademarkRepository::new(store.clone());
    let checkpoints = CheckpointRepository::new(store.clone());

    let http = build_http_client(&registry_settings).expect("http client");
    let sessions = Arc::new(SessionManager::new(http.clone(), &registry_settings));
    let registry: Arc<dyn RegistryQuery> = Arc::new(RegistryClient::new(
        http.clone(),
        sessions.clone(),
        &registry_settings,
    ));
    let health: Arc<dyn HealthCheck> =
        Arc::new(RegistryHealthMonitor::new(sessions, store.clone()));

    let manager = Arc::new(CrawlManager::new(
        registry.clone(),
        health.clone(),
        trademarks.clone(),
        checkpoints.clone(),
        crawl_settings,
    ));

    let router = routes::app(AppServices {
        crawl: Arc::new(CrawlUseCase::new(manager.clone(), checkpoints)),
        lookup: Arc::new(LookupService::new(
            trademarks.clone(),
            registry,
            &lookup_settings,
        )),
        health,
        trademarks: Arc::new(trademarks),
        brand_counts: Arc::new(BrandCountService::new(
            AttorneyRepository::new(store.clone()),
            Arc::new(MarciaClient::new(http, &marcia_settings)),
            &marcia_settings,
        )),
    });

    TestApp {
        router,
        store,
        portal,
        manager,
    }
}

/// 挂载查询响应：指定申请号返回样例页面，其余返回空结果页面
pub async fn mount_records(portal: &MockServer, application_numbers: &[&str]) {
    for number in application_numbers {
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(body_string_contains(format!(
                "frmBsqExp%3AexpedienteId={}&",
                number
            )))
            .respond_with(ResponseTemplate::new(200).set_body_string(RECORD_PAGE))
            .with_priority(1)
            .mount(portal)
            .await;
    }

    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .with_priority(10)
        .mount(portal)
        .await;
}

impl TestApp {
    /// 发送请求并解析 JSON 响应体（非 JSON 时返回字符串）
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
