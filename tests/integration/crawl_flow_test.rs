// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, mount_records};
use acervors::domain::repositories::document_store::{DocumentStore, ATTORNEYS, TRADEMARKS};
use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;

/// 完整爬取流程：真实 HTTP 请求经过模拟门户，记录和代理人索引写入存储
#[tokio::test]
async fn test_crawl_saves_found_records() {
    let app = create_test_app().await;
    mount_records(&app.portal, &["3544901"]).await;

    let (status, _) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 3544903, "range_end": 3544899, "job_id": "flow" }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(app.manager.wait_idle(Duration::from_secs(10)).await);

    let (status, checkpoint) = app.get("/v1/crawl/flow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checkpoint["state"], "completed");
    assert_eq!(checkpoint["last_processed"], 3544899);
    assert_eq!(checkpoint["remaining"], 0);
    assert_eq!(checkpoint["total_processed"], 5);
    assert_eq!(checkpoint["total_successful"], 1);
    assert_eq!(checkpoint["total_not_found"], 4);
    assert_eq!(checkpoint["total_failed"], 0);

    assert_eq!(app.store.count(TRADEMARKS), 1);
    let saved = app
        .store
        .get(TRADEMARKS, "3544901")
        .await
        .unwrap()
        .expect("record saved");
    assert_eq!(saved.data["general_data"]["registration_number"], "2456789");
    assert_eq!(saved.data["application_number_numeric"], 3544901);
    assert!(saved.data.get("source").is_none());

    let attorney = app
        .store
        .get(ATTORNEYS, "MARÍA_LÓPEZ_RAMÍREZ")
        .await
        .unwrap()
        .expect("attorney indexed");
    assert_eq!(attorney.data["email"], "mlopez@despacho-lr.mx");
    assert_eq!(attorney.data["applications"], json!(["3544901"]));

    // A finished job cannot be started again.
    let (status, _) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 3544903, "range_end": 3544899, "job_id": "flow" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The saved record now answers lookups without touching the portal.
    let (status, body) = app
        .post_json("/v1/lookup", json!({ "application_number": 3544901 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["holder"]["name"], "Jane Doe");
}

/// 门户不可达时爬取进入恢复流程，探测失败后以错误状态结束
#[tokio::test]
async fn test_crawl_stops_with_error_when_portal_is_gone() {
    let app = create_test_app().await;
    // Without the session page every query fails before reaching the form.
    app.portal.reset().await;

    let (status, _) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 120, "range_end": 100, "job_id": "down" }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(app.manager.wait_idle(Duration::from_secs(10)).await);

    let (_, checkpoint) = app.get("/v1/crawl/down").await;
    assert_eq!(checkpoint["state"], "error");
    assert_eq!(checkpoint["total_failed"], 5);
    assert_eq!(checkpoint["total_successful"], 0);
    assert_eq!(checkpoint["last_processed"], 117);
    assert_eq!(app.store.count(TRADEMARKS), 0);
}
