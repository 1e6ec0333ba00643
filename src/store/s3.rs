// s3 (and s3-compatible) object store backed by the aws sdk

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::DateTime as S3DateTime,
    types::Object,
    Client,
};
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, instrument};

use super::{ListOutput, ObjectStore, ObjectSummary, StoreError};
use crate::config::StoreConfig;

/// lists buckets through `ListObjectsV2`, following continuation tokens
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// build a client from region, endpoint, addressing and credentials
    ///
    /// without static credentials the sdk's default provider chain is used.
    pub async fn connect(config: &StoreConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "s3browse-config",
            ));
        }

        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.use_path_style)
            .build();

        Self::from_client(Client::from_conf(s3_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self), level = "debug")]
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError> {
        let mut output = ListOutput::default();
        let mut continuation: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_delimiter(delimiter.map(str::to_string))
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|err| match err.as_service_error() {
                    Some(service) if service.is_no_such_bucket() => {
                        StoreError::NoSuchBucket(bucket.to_string())
                    }
                    _ => StoreError::Remote(DisplayErrorContext(&err).to_string()),
                })?;
            pages += 1;

            output.common_prefixes.extend(
                page.common_prefixes()
                    .iter()
                    .filter_map(|common| common.prefix().map(str::to_string)),
            );
            output
                .contents
                .extend(page.contents().iter().filter_map(object_summary));

            match page.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        debug!(
            "{} pages, {} prefixes, {} objects",
            pages,
            output.common_prefixes.len(),
            output.contents.len()
        );
        Ok(output)
    }
}

/// map an sdk object to a summary; objects without a key are dropped
fn object_summary(object: &Object) -> Option<ObjectSummary> {
    let key = object.key()?.to_string();
    let size = object.size().unwrap_or(0).max(0) as u64;
    let last_modified = object
        .last_modified()
        .map(to_utc)
        .unwrap_or_default();

    Some(ObjectSummary {
        key,
        size,
        last_modified,
    })
}

fn to_utc(time: &S3DateTime) -> DateTime<Utc> {
    Utc.timestamp_opt(time.secs(), time.subsec_nanos())
        .single()
        .unwrap_or_default()
}
