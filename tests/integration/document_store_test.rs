// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use acervors::domain::repositories::document_store::{DocumentStore, OrderBy, SortDirection};
use acervors::infrastructure::repositories::document_store_impl::SeaOrmDocumentStore;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn create_store() -> SeaOrmDocumentStore {
    // A single connection keeps every query on the same in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    SeaOrmDocumentStore::new(Arc::new(db))
}

#[tokio::test]
async fn test_set_and_get_round_trip() {
    let store = create_store().await;

    assert!(store.get("trademarks", "1").await.unwrap().is_none());

    let written = store
        .set("trademarks", "1", json!({ "status": "found" }), false)
        .await
        .unwrap();
    assert_eq!(written.key, "1");

    let doc = store.get("trademarks", "1").await.unwrap().unwrap();
    assert_eq!(doc.data, json!({ "status": "found" }));
    assert!(store.get("attorneys", "1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_merge_keeps_existing_fields() {
    let store = create_store().await;
    store
        .set(
            "crawl_checkpoints",
            "job",
            json!({ "state": "running", "totals": { "processed": 1, "failed": 0 } }),
            false,
        )
        .await
        .unwrap();

    store
        .set(
            "crawl_checkpoints",
            "job",
            json!({ "state": "paused", "totals": { "processed": 2 } }),
            true,
        )
        .await
        .unwrap();

    let doc = store.get("crawl_checkpoints", "job").await.unwrap().unwrap();
    assert_eq!(
        doc.data,
        json!({ "state": "paused", "totals": { "processed": 2, "failed": 0 } })
    );
    assert!(doc.updated_at >= doc.created_at);
}

#[tokio::test]
async fn test_replace_drops_missing_fields() {
    let store = create_store().await;
    store
        .set("trademarks", "7", json!({ "a": 1, "b": 2 }), false)
        .await
        .unwrap();
    store
        .set("trademarks", "7", json!({ "b": 3 }), false)
        .await
        .unwrap();

    let doc = store.get("trademarks", "7").await.unwrap().unwrap();
    assert_eq!(doc.data, json!({ "b": 3 }));
}

#[tokio::test]
async fn test_query_orders_by_last_write() {
    let store = create_store().await;
    for key in ["a", "b", "c"] {
        store
            .set("trademarks", key, json!({ "key": key }), false)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    store
        .set("trademarks", "a", json!({ "touched": true }), true)
        .await
        .unwrap();
    store
        .set("attorneys", "z", json!({}), false)
        .await
        .unwrap();

    let newest: Vec<String> = store
        .query("trademarks", OrderBy::UpdatedAt, SortDirection::Descending, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.key)
        .collect();
    assert_eq!(newest, vec!["a", "c"]);

    let oldest: Vec<String> = store
        .query("trademarks", OrderBy::CreatedAt, SortDirection::Ascending, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.key)
        .collect();
    assert_eq!(oldest, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_ping() {
    let store = create_store().await;
    assert!(store.ping().await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_merges_keep_every_field() {
    let store = Arc::new(create_store().await);

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .set(
                        "attorneys",
                        "JANE_DOE",
                        json!({ "applications": { format!("35449{:02}", i): true } }),
                        true,
                    )
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let doc = store.get("attorneys", "JANE_DOE").await.unwrap().unwrap();
    let applications = doc.data["applications"].as_object().unwrap();
    assert_eq!(applications.len(), 10);
    assert!(applications.contains_key("3544900"));
    assert!(applications.contains_key("3544909"));
}
