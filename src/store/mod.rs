//! Object store abstraction.
//!
//! The browser only ever reads from a store through [`ObjectStore::list`],
//! which mirrors an S3 `ListObjectsV2` call: a bucket, a key prefix and an
//! optional delimiter. Backends keep a flat key space and share
//! [`group_by_delimiter`] to produce the folder/object split.

pub mod fs;
pub mod memory;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// the "/" delimiter used to emulate one level of hierarchy
pub const DELIMITER: &str = "/";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket does not exist: {0}")]
    NoSuchBucket(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("remote store error: {0}")]
    Remote(String),
}

/// one object as reported by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// result of a single list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOutput {
    /// direct child "folders", each ending with the delimiter
    pub common_prefixes: Vec<String>,
    /// objects matching the prefix (direct children when delimited)
    pub contents: Vec<ObjectSummary>,
}

/// read-only view of a bucketed key/value store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// list keys in `bucket` starting with `prefix`, grouped at `delimiter`
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError>;
}

/// construct the configured store backend
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    match config.backend {
        StoreBackend::S3 => {
            let store = S3ObjectStore::connect(config).await;
            info!(
                "serving bucket {} from s3 ({})",
                config.bucket,
                config.endpoint.as_deref().unwrap_or("aws")
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Filesystem => {
            let store = FsObjectStore::open(&config.root)?;
            info!("serving buckets from: {}", store.root().display());
            Ok(Arc::new(store))
        }
    }
}

/// split a key-sorted object set the way a delimited listing does
///
/// objects whose key continues past `prefix` with another delimiter are
/// folded into a single common prefix; everything else (including an object
/// whose key equals `prefix`) is returned as content. input order is kept.
pub fn group_by_delimiter<I>(objects: I, prefix: &str, delimiter: Option<&str>) -> ListOutput
where
    I: IntoIterator<Item = ObjectSummary>,
{
    let mut output = ListOutput::default();

    for object in objects {
        let Some(rest) = object.key.strip_prefix(prefix) else {
            continue;
        };

        let folded = delimiter
            .filter(|d| !d.is_empty())
            .and_then(|d| rest.find(d).map(|idx| idx + d.len()));

        match folded {
            Some(end) => {
                let common = format!("{prefix}{}", &rest[..end]);
                if output.common_prefixes.last() != Some(&common) {
                    output.common_prefixes.push(common);
                }
            }
            None => output.contents.push(object),
        }
    }

    output
}
