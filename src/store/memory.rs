// in-memory object store, handy for tests and embedding

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{group_by_delimiter, ListOutput, ObjectStore, ObjectSummary, StoreError};

/// bucket name -> key -> (size, last modified)
type Buckets = BTreeMap<String, BTreeMap<String, (u64, DateTime<Utc>)>>;

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<Buckets>,
    list_calls: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// create an empty bucket
    pub fn create_bucket(&self, bucket: &str) {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets.entry(bucket.to_string()).or_default();
    }

    /// insert or replace an object, creating the bucket when needed
    pub fn insert(&self, bucket: &str, key: &str, size: u64, last_modified: DateTime<Utc>) {
        let mut buckets = self.buckets.write().unwrap_or_else(|e| e.into_inner());
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), (size, last_modified));
    }

    /// number of list calls served so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let buckets = self.buckets.read().unwrap_or_else(|e| e.into_inner());
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;

        let matching = objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, (size, last_modified))| ObjectSummary {
                key: key.clone(),
                size: *size,
                last_modified: *last_modified,
            });

        Ok(group_by_delimiter(matching, prefix, delimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DELIMITER;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_lists_and_counts_calls() {
        let store = MemoryObjectStore::new();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        store.insert("b", "a/1.txt", 10, ts);
        store.insert("b", "a/2.txt", 20, ts);
        store.insert("b", "top.txt", 30, ts);

        let output = store.list("b", "", Some(DELIMITER)).await.unwrap();
        assert_eq!(output.common_prefixes, vec!["a/"]);
        assert_eq!(output.contents.len(), 1);

        let output = store.list("b", "a/", None).await.unwrap();
        assert_eq!(output.contents.len(), 2);
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_bucket() {
        let store = MemoryObjectStore::new();
        store.create_bucket("present");

        assert!(store.list("present", "", None).await.unwrap().contents.is_empty());
        assert!(matches!(
            store.list("absent", "", None).await,
            Err(StoreError::NoSuchBucket(_))
        ));
    }
}
