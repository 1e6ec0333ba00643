// turn one delimited store listing into a folder/file view

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::access::is_reserved;
use crate::store::{ObjectStore, ObjectSummary, StoreError, DELIMITER};
use crate::utils::paths::last_segment;

/// a direct child folder of the listed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub prefix: String,
    /// latest modification under the folder, filled in by the freshness pass
    pub last_modified: Option<DateTime<Utc>>,
}

/// folders and files directly under a path, in store order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingResult {
    pub folders: Vec<FolderEntry>,
    pub files: Vec<ObjectSummary>,
}

impl ListingResult {
    /// the explicit "no content" state
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// list the folders and files directly under `path`
///
/// the folder marker object (key equal to `path`) is never reported as a
/// file, and at the root reserved folders are hidden from the result.
#[instrument(skip(store))]
pub async fn list(
    store: &dyn ObjectStore,
    bucket: &str,
    path: &str,
) -> Result<ListingResult, StoreError> {
    let output = store.list(bucket, path, Some(DELIMITER)).await?;
    let at_root = path.is_empty();

    let folders: Vec<FolderEntry> = output
        .common_prefixes
        .into_iter()
        .filter_map(|prefix| {
            let name = last_segment(&prefix).to_string();
            if at_root && is_reserved(&name) {
                debug!("hiding reserved folder: {}", prefix);
                return None;
            }
            Some(FolderEntry {
                name,
                prefix,
                last_modified: None,
            })
        })
        .collect();

    let files: Vec<ObjectSummary> = output
        .contents
        .into_iter()
        .filter(|object| object.key != path)
        .collect();

    debug!("{} folders, {} files", folders.len(), files.len());
    Ok(ListingResult { folders, files })
}
