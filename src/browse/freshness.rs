// latest modification time under each listed folder

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, instrument};

use super::listing::FolderEntry;
use crate::store::{ObjectStore, StoreError};

/// newest `last_modified` of any object below `folder_prefix`
///
/// issues one recursive (undelimited) listing; `None` when the folder holds
/// no objects at all.
#[instrument(skip(store), level = "debug")]
pub async fn resolve(
    store: &dyn ObjectStore,
    bucket: &str,
    folder_prefix: &str,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    let output = store.list(bucket, folder_prefix, None).await?;
    let latest = output.contents.iter().map(|o| o.last_modified).max();

    debug!("{} objects, latest {:?}", output.contents.len(), latest);
    Ok(latest)
}

/// fill in `last_modified` for every folder
///
/// up to `concurrency` listings run at once. folders keep their order and
/// the first failing listing aborts the whole pass.
pub async fn resolve_all(
    store: &dyn ObjectStore,
    bucket: &str,
    folders: &mut [FolderEntry],
    concurrency: usize,
) -> Result<(), StoreError> {
    let lookups: Vec<_> = folders
        .iter()
        .map(|folder| resolve(store, bucket, &folder.prefix))
        .collect();

    let resolved: Vec<Option<DateTime<Utc>>> = stream::iter(lookups)
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    for (folder, last_modified) in folders.iter_mut().zip(resolved) {
        folder.last_modified = last_modified;
    }
    Ok(())
}
