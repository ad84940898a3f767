// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, mount_records};
use acervors::domain::models::trademark::{GeneralData, RecordStatus, TrademarkRecord};
use acervors::domain::repositories::document_store::{DocumentStore, ATTORNEYS};
use acervors::domain::repositories::trademark_repository::TrademarkRepository;
use acervors::engines::marcia_client::COUNT_PATH;
use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_health_and_version() {
    let app = create_test_app().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));

    let (status, body) = app.get("/v1/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_lookup_single_key_goes_live() {
    let app = create_test_app().await;
    mount_records(&app.portal, &["3544901"]).await;

    let (status, body) = app
        .post_json("/v1/lookup", json!({ "application_number": "3544901" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "found");
    assert_eq!(body["source"], "live-scrape");
    assert_eq!(body["application_number"], "3544901");
    assert_eq!(body["general_data"]["denomination"], "AUSTIN VENOM");
    assert_eq!(body["attorney"]["email"], "mlopez@despacho-lr.mx");
}

#[tokio::test]
async fn test_lookup_list_keeps_input_order() {
    let app = create_test_app().await;
    mount_records(&app.portal, &["3544901"]).await;

    let (status, body) = app
        .post_json(
            "/v1/lookup",
            json!({ "application_numbers": ["3544900", 3544901, "  "] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["application_number"], "3544900");
    assert_eq!(results[0]["status"], "not_found");
    assert!(results[0].get("source").is_none());
    assert_eq!(results[1]["application_number"], "3544901");
    assert_eq!(results[1]["status"], "found");
}

#[tokio::test]
async fn test_lookup_rejects_empty_and_oversized_requests() {
    let app = create_test_app().await;

    let (status, body) = app
        .post_json("/v1/lookup", json!({ "application_numbers": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let keys: Vec<String> = (1..=6).map(|n| n.to_string()).collect();
    let (status, _) = app
        .post_json("/v1/lookup", json!({ "application_numbers": keys }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lookup_prefers_saved_record() {
    let app = create_test_app().await;
    mount_records(&app.portal, &["3544901"]).await;

    let saved = TrademarkRecord {
        status: RecordStatus::Found,
        application_number: "3544901".to_string(),
        general_data: GeneralData {
            application_number: "3544901".to_string(),
            denomination: "SAVED COPY".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    TrademarkRepository::new(app.store.clone())
        .create(&saved)
        .await
        .unwrap();

    let (status, body) = app
        .post_json("/v1/lookup", json!({ "application_number": "3544901" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["general_data"]["denomination"], "SAVED COPY");

    let posts = app
        .portal
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.to_string() == "POST")
        .count();
    assert_eq!(posts, 0);
}

#[tokio::test]
async fn test_lookup_falls_back_to_portal_when_store_is_down() {
    let app = create_test_app().await;
    mount_records(&app.portal, &["3544901"]).await;
    app.store.set_available(false);

    let (status, body) = app
        .post_json("/v1/lookup", json!({ "application_number": "3544901" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live-scrape");
}

#[tokio::test]
async fn test_crawl_rejects_inverted_range() {
    let app = create_test_app().await;

    let (status, body) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 100, "range_end": 200 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(app.manager.active_job().is_none());
}

#[tokio::test]
async fn test_crawl_start_stop_and_resume() {
    let app = create_test_app().await;
    mount_records(&app.portal, &[]).await;

    let (status, body) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 500000, "range_end": 1, "job_id": "bulk-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["job_id"], "bulk-1");
    assert!(body.get("resumed_from").is_none());

    // A second job is refused while the first one runs.
    let (status, _) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 20, "range_end": 10, "job_id": "bulk-2" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.post_json("/v1/crawl/bulk-1/stop", json!({})).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "stopping");

    assert!(app.manager.wait_idle(Duration::from_secs(10)).await);

    let (status, checkpoint) = app.get("/v1/crawl/bulk-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checkpoint["state"], "paused");
    assert_eq!(checkpoint["active"], false);
    let paused_at = checkpoint["last_processed"].as_u64().unwrap();
    assert!(paused_at <= 500000 && paused_at > 1);

    // Stopping again has nothing to stop.
    let (status, _) = app.post_json("/v1/crawl/bulk-1/stop", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, suggestion) = app.get("/v1/crawl/resume").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(suggestion["checkpoint"]["job_id"], "bulk-1");
    assert_eq!(suggestion["request"]["job_id"], "bulk-1");
    assert_eq!(suggestion["request"]["range_end"], 1);

    // Resuming with a different lower bound is a different job.
    let (status, _) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 500000, "range_end": 2, "job_id": "bulk-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .post_json(
            "/v1/crawl",
            json!({ "range_start": 500000, "range_end": 1, "job_id": "bulk-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["resumed_from"], paused_at);

    app.manager.stop("bulk-1");
    assert!(app.manager.wait_idle(Duration::from_secs(10)).await);
}

#[tokio::test]
async fn test_crawl_unknown_job() {
    let app = create_test_app().await;

    let (status, _) = app.get("/v1/crawl/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/v1/crawl/resume").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No resumable crawl");
}

#[tokio::test]
async fn test_recent_trademarks() {
    let app = create_test_app().await;
    let repository = TrademarkRepository::new(app.store.clone());
    for number in ["101", "102", "103"] {
        let record = TrademarkRecord {
            status: RecordStatus::Found,
            application_number: number.to_string(),
            ..Default::default()
        };
        repository.create(&record).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (status, body) = app.get("/v1/trademarks?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["application_number"], "103");
    assert_eq!(records[1]["application_number"], "102");
    assert_eq!(records[0]["source"], "cache");
}

#[tokio::test]
async fn test_duplicates_endpoint() {
    let app = create_test_app().await;

    let (status, body) = app
        .post_json(
            "/v1/duplicates",
            json!({
                "prospects": [
                    { "id": "a", "name": "Jane Doe" },
                    { "id": "b", "name": "JANE DOE", "email": "jane.doe@example.com" },
                    { "id": "c", "name": "Carlos Ruiz" }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duplicate_count"], 2);
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["match_type"], "case-insensitive");
    assert_eq!(groups[0]["suggested_keep_id"], "b");

    let (status, _) = app
        .post_json("/v1/duplicates", json!({ "prospects": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registry_health() {
    let app = create_test_app().await;

    let (status, body) = app.get("/v1/registry/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"], true);
    assert_eq!(body["store"], true);

    app.store.set_available(false);
    let (status, body) = app.get("/v1/registry/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["session"], true);
    assert_eq!(body["store"], false);
}

#[tokio::test]
async fn test_attorney_brand_counts() {
    let app = create_test_app().await;
    for (key, name) in [("JANE_DOE", "Jane Doe"), ("ANA_RUIZ", "Ana Ruiz")] {
        app.store
            .set(ATTORNEYS, key, json!({ "name": name, "applications": ["3544901"] }), false)
            .await
            .unwrap();
    }
    Mock::given(method("POST"))
        .and(path(COUNT_PATH))
        .and(body_partial_json(json!({ "query": { "name": { "name": "Jane Doe" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 27 })))
        .mount(&app.portal)
        .await;
    Mock::given(method("POST"))
        .and(path(COUNT_PATH))
        .and(body_partial_json(json!({ "query": { "name": { "name": "Ana Ruiz" } } })))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.portal)
        .await;

    let (status, body) = app.post_json("/v1/attorneys/brand-counts", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["processed"], 2);
    assert_eq!(body["succeeded"], 1);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["message"], "Updated 2 attorneys");

    let jane = app.store.get(ATTORNEYS, "JANE_DOE").await.unwrap().unwrap();
    assert_eq!(jane.data["brand_count"], 27);
    assert_eq!(jane.data["applications"], json!(["3544901"]));
    let ana = app.store.get(ATTORNEYS, "ANA_RUIZ").await.unwrap().unwrap();
    assert_eq!(ana.data["brand_count"], 0);

    let (status, body) = app
        .post_json("/v1/attorneys/brand-counts?limit=1", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 1);

    app.store.set_available(false);
    let (status, body) = app.post_json("/v1/attorneys/brand-counts", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}
