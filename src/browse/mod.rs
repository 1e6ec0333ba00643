//! Core browsing logic: access decision, listing and folder freshness.
//!
//! [`browse`] runs the full per-request sequence. It never touches markup;
//! the server renders the returned [`BrowsePage`].

pub mod access;
pub mod freshness;
pub mod listing;

use tracing::{info, warn};

use crate::store::{ObjectStore, StoreError};
use crate::utils::paths;

pub use access::{decide, AccessDecision, RESERVED_PREFIX};
pub use listing::{FolderEntry, ListingResult};

/// everything the presentation layer needs for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsePage {
    /// normalized path that was listed ("" for the bucket root)
    pub path: String,
    /// target of the "back" link
    pub parent: String,
    pub listing: ListingResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browse {
    /// direct navigation into a reserved folder; nothing was listed
    Denied { path: String },
    Listed(BrowsePage),
}

/// handle one browse request for `raw_prefix`
///
/// normalizes the prefix, applies the access rule, lists the path and then
/// resolves the freshness of every folder shown. a denied request makes no
/// store call.
pub async fn browse(
    store: &dyn ObjectStore,
    bucket: &str,
    raw_prefix: &str,
    concurrency: usize,
) -> Result<Browse, StoreError> {
    let path = paths::normalize(raw_prefix);

    if !decide(&path).allowed {
        warn!("denied direct access to reserved folder: {}", path);
        return Ok(Browse::Denied { path });
    }

    let mut listing = listing::list(store, bucket, &path).await?;
    freshness::resolve_all(store, bucket, &mut listing.folders, concurrency).await?;

    info!(
        "listed {:?}: {} folders, {} files",
        path,
        listing.folders.len(),
        listing.files.len()
    );

    Ok(Browse::Listed(BrowsePage {
        parent: paths::parent(&path),
        path,
        listing,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryObjectStore;
    use chrono::{TimeZone, Utc};

    fn store() -> MemoryObjectStore {
        let store = MemoryObjectStore::new();
        let old = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.insert("b", "PRIVATE_x/secret.txt", 1, old);
        store.insert("b", "PRIVATE_x/inner/deep.txt", 1, old);
        store.insert("b", "music/a.mp3", 1, old);
        store.insert("b", "music/live/b.mp3", 1, new);
        store
    }

    #[tokio::test]
    async fn test_denied_request_makes_no_store_call() {
        let store = store();
        let outcome = browse(&store, "b", "/PRIVATE_x", 4).await.unwrap();

        assert_eq!(
            outcome,
            Browse::Denied {
                path: "PRIVATE_x/".to_string()
            }
        );
        assert_eq!(store.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_deep_link_into_reserved_folder_is_listed() {
        let store = store();
        let Browse::Listed(page) = browse(&store, "b", "PRIVATE_x/inner", 4).await.unwrap() else {
            panic!("expected a listing");
        };

        assert_eq!(page.path, "PRIVATE_x/inner/");
        assert_eq!(page.parent, "PRIVATE_x/");
        assert_eq!(page.listing.files[0].key, "PRIVATE_x/inner/deep.txt");
    }

    #[tokio::test]
    async fn test_root_listing_resolves_freshness() {
        let store = store();
        let Browse::Listed(page) = browse(&store, "b", "", 4).await.unwrap() else {
            panic!("expected a listing");
        };

        assert_eq!(page.path, "");
        assert_eq!(page.parent, "");
        assert_eq!(page.listing.folders.len(), 1);
        assert_eq!(page.listing.folders[0].name, "music");
        assert_eq!(
            page.listing.folders[0].last_modified,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        // one delimited listing plus one freshness listing
        assert_eq!(store.list_calls(), 2);
    }
}
