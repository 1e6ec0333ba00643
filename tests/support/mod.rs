// shared test helpers
#![allow(dead_code)] // helpers are shared across multiple integration test crates

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use s3browse::{
    config::{AppConfig, StoreBackend, StoreConfig},
    server::create_app_with_store,
    store::{ListOutput, MemoryObjectStore, ObjectStore, StoreError},
};

pub const BUCKET: &str = "media";

pub fn base_config(root: &Path) -> AppConfig {
    AppConfig {
        store: StoreConfig {
            backend: StoreBackend::Filesystem,
            root: root.to_path_buf(),
            bucket: BUCKET.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// a bucket with public folders, a reserved folder and a marker object
pub fn seeded_store() -> Arc<MemoryObjectStore> {
    let store = MemoryObjectStore::new();
    store.insert(BUCKET, "PRIVATE_finance/ledger.csv", 900, at(2024, 1, 1));
    store.insert(BUCKET, "PRIVATE_finance/2023/q4.csv", 800, at(2024, 2, 1));
    store.insert(BUCKET, "docs/", 0, at(2022, 1, 1));
    store.insert(BUCKET, "docs/manual.pdf", 1536, at(2023, 3, 4));
    store.insert(BUCKET, "docs/PRIVATE_drafts/plan.md", 10, at(2023, 9, 9));
    store.insert(BUCKET, "photos/2024/beach.jpg", 1048576, at(2024, 7, 20));
    store.insert(BUCKET, "photos/cat.jpg", 2048, at(2023, 5, 1));
    store.insert(BUCKET, "readme.txt", 0, at(2021, 6, 6));
    Arc::new(store)
}

pub fn app_with(store: Arc<dyn ObjectStore>) -> axum::Router {
    create_app_with_store(base_config(Path::new(".")), store)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// store that refuses every request
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn list(
        &self,
        _bucket: &str,
        _prefix: &str,
        _delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )))
    }
}

/// store whose recursive listings fail, delimited ones are served normally
pub struct BrokenFreshnessStore(pub Arc<MemoryObjectStore>);

#[async_trait]
impl ObjectStore for BrokenFreshnessStore {
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError> {
        if delimiter.is_none() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "timed out",
            )));
        }
        self.0.list(bucket, prefix, delimiter).await
    }
}

/// store that never answers
pub struct StalledStore;

#[async_trait]
impl ObjectStore for StalledStore {
    async fn list(
        &self,
        _bucket: &str,
        _prefix: &str,
        _delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}
