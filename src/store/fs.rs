// filesystem-backed object store: one directory per bucket

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use super::{group_by_delimiter, ListOutput, ObjectStore, ObjectSummary, StoreError, DELIMITER};

/// serves every sub-directory of `root` as a bucket
///
/// regular files become objects keyed by their "/"-joined path relative to the
/// bucket directory. empty directories show up as zero-byte marker objects
/// (`name/`), the way s3 consoles represent folders created without content.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// open a store rooted at an existing directory
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("store root is not a directory: {}", root.display()),
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        let mut components = Path::new(bucket).components();
        let valid = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        let dir = self.root.join(bucket);
        if !valid || !dir.is_dir() {
            return Err(StoreError::NoSuchBucket(bucket.to_string()));
        }
        Ok(dir)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    #[instrument(skip(self), level = "debug")]
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ListOutput, StoreError> {
        let bucket_dir = self.bucket_dir(bucket)?;
        let walk_from = walk_start(&bucket_dir, prefix);

        let objects =
            tokio::task::spawn_blocking(move || collect_objects(&bucket_dir, &walk_from))
                .await??;

        debug!("{} objects under prefix {:?}", objects.len(), prefix);
        Ok(group_by_delimiter(objects, prefix, delimiter))
    }
}

/// deepest directory that can hold every key starting with `prefix`
///
/// only plain path components are ever joined onto the bucket directory;
/// a prefix with "." or ".." segments falls back to walking the whole
/// bucket, where it simply matches no key.
fn walk_start(bucket_dir: &Path, prefix: &str) -> PathBuf {
    let dir_part = match prefix.rfind(DELIMITER) {
        Some(idx) => &prefix[..idx],
        None => return bucket_dir.to_path_buf(),
    };

    let plain = dir_part.split(DELIMITER).all(|segment| {
        let mut components = Path::new(segment).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(name)), None) if name == segment
        )
    });

    if plain {
        bucket_dir.join(dir_part)
    } else {
        bucket_dir.to_path_buf()
    }
}

/// walk a directory tree and return its objects sorted by key
fn collect_objects(bucket_dir: &Path, walk_from: &Path) -> Result<Vec<ObjectSummary>, StoreError> {
    if !walk_from.is_dir() {
        return Ok(Vec::new());
    }

    // a symlinked folder may resolve outside the bucket; list nothing then
    let Ok(resolved) = walk_from.canonicalize() else {
        return Ok(Vec::new());
    };
    if !resolved.starts_with(bucket_dir.canonicalize()?) {
        warn!("walk root resolves outside the bucket: {}", walk_from.display());
        return Ok(Vec::new());
    }

    let mut objects = Vec::new();
    for entry in WalkDir::new(walk_from) {
        let entry = entry.map_err(walk_error)?;
        if entry.path() == bucket_dir {
            continue;
        }

        let Some(key) = object_key(bucket_dir, entry.path()) else {
            warn!("skipping entry with non utf-8 name: {}", entry.path().display());
            continue;
        };

        let metadata = entry.metadata().map_err(walk_error)?;

        if metadata.is_file() {
            objects.push(ObjectSummary {
                key,
                size: metadata.len(),
                last_modified: modified_at(metadata.modified()?),
            });
        } else if metadata.is_dir() && is_empty_dir(entry.path())? {
            objects.push(ObjectSummary {
                key: format!("{key}{DELIMITER}"),
                size: 0,
                last_modified: modified_at(metadata.modified()?),
            });
        }
    }

    objects.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(objects)
}

fn object_key(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(DELIMITER))
}

fn walk_error(err: walkdir::Error) -> std::io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message))
}

fn is_empty_dir(path: &Path) -> Result<bool, StoreError> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

fn modified_at(time: SystemTime) -> DateTime<Utc> {
    time.into()
}
