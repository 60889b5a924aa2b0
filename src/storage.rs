//! Object storage for uploaded images.
//!
//! Buckets are directories below the uploads root, objects are files inside
//! them, and public URLs point at the `/uploads` static route.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// URL prefix under which the uploads root is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MAX_KEY_LEN: usize = 96;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("invalid bucket name `{0}`")]
    InvalidBucket(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal bucket/key store used by the upload services.
pub trait ObjectStorage {
    /// Creates the bucket when it does not exist yet.
    fn ensure_bucket(&self, bucket: &str) -> StorageResult<()>;
    /// Stores `bytes` under a key derived from `file_name` and returns the key.
    fn upload(&self, bucket: &str, file_name: &str, bytes: &[u8]) -> StorageResult<String>;
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Filesystem-backed storage rooted at `UPLOADS_DIR`.
#[derive(Debug, Clone)]
pub struct FsObjectStorage {
    root: PathBuf,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> StorageResult<PathBuf> {
        if !is_valid_bucket(bucket) {
            return Err(StorageError::InvalidBucket(bucket.to_string()));
        }
        Ok(self.root.join(bucket))
    }
}

impl ObjectStorage for FsObjectStorage {
    fn ensure_bucket(&self, bucket: &str) -> StorageResult<()> {
        fs::create_dir_all(self.bucket_path(bucket)?)?;
        Ok(())
    }

    fn upload(&self, bucket: &str, file_name: &str, bytes: &[u8]) -> StorageResult<String> {
        let dir = self.bucket_path(bucket)?;
        if !dir.is_dir() {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }

        let key = object_key(file_name);
        fs::write(dir.join(&key), bytes)?;
        log::info!("Stored {} bytes as {bucket}/{key}", bytes.len());
        Ok(key)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{PUBLIC_PREFIX}/{bucket}/{key}")
    }
}

fn is_valid_bucket(bucket: &str) -> bool {
    !bucket.is_empty()
        && bucket
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Timestamp-prefixed file name restricted to `[A-Za-z0-9._-]`.
pub fn object_key(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let mut sanitized: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = sanitized.trim_start_matches('.');
    sanitized = if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    };
    if sanitized.len() > MAX_KEY_LEN {
        sanitized = sanitized.split_off(sanitized.len() - MAX_KEY_LEN);
    }

    format!("{}-{sanitized}", Utc::now().timestamp_millis())
}

/// Creates the default bucket and every configured bucket.
pub fn bootstrap_buckets<S>(storage: &S, default_bucket: &str, buckets: &[String]) -> StorageResult<()>
where
    S: ObjectStorage + ?Sized,
{
    storage.ensure_bucket(default_bucket)?;
    for bucket in buckets {
        storage.ensure_bucket(bucket)?;
    }
    Ok(())
}

/// Uploads into `bucket`, retrying once against `default_bucket` when the
/// bucket is missing. Returns the public URL of the stored object.
pub fn upload_with_fallback<S>(
    storage: &S,
    bucket: &str,
    default_bucket: &str,
    file_name: &str,
    bytes: &[u8],
) -> StorageResult<String>
where
    S: ObjectStorage + ?Sized,
{
    match storage.upload(bucket, file_name, bytes) {
        Ok(key) => Ok(storage.public_url(bucket, &key)),
        Err(StorageError::BucketNotFound(missing)) if missing != default_bucket => {
            log::warn!("Bucket {missing} not found, uploading to {default_bucket}");
            let key = storage.upload(default_bucket, file_name, bytes)?;
            Ok(storage.public_url(default_bucket, &key))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn object_key_strips_paths_and_odd_characters() {
        let key = object_key("../../etc/my photo (1).png");
        let (timestamp, name) = key.split_once('-').expect("timestamp prefix");

        assert!(timestamp.chars().all(|ch| ch.is_ascii_digit()));
        assert_eq!(name, "my_photo__1_.png");
        assert!(object_key("").ends_with("-file"));
        assert!(object_key(".hidden").ends_with("-hidden"));
    }

    #[test]
    fn upload_into_existing_bucket() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FsObjectStorage::new(dir.path());
        storage.ensure_bucket("branches").expect("bucket");

        let url = upload_with_fallback(&storage, "branches", "public", "front.png", b"img")
            .expect("upload");

        assert!(url.starts_with("/uploads/branches/"));
        let key = url.rsplit('/').next().expect("key");
        let stored = fs::read(dir.path().join("branches").join(key)).expect("stored file");
        assert_eq!(stored, b"img");
    }

    #[test]
    fn missing_bucket_falls_back_to_default() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FsObjectStorage::new(dir.path());
        bootstrap_buckets(&storage, "public", &[]).expect("bootstrap");

        let url = upload_with_fallback(&storage, "banners", "public", "b.jpg", b"img")
            .expect("fallback upload");

        assert!(url.starts_with("/uploads/public/"));
        assert!(!dir.path().join("banners").exists());
    }

    #[test]
    fn missing_default_bucket_is_reported() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FsObjectStorage::new(dir.path());

        let result = upload_with_fallback(&storage, "banners", "public", "b.jpg", b"img");

        assert!(matches!(result, Err(StorageError::BucketNotFound(bucket)) if bucket == "public"));
    }

    #[test]
    fn bucket_names_are_validated() {
        let dir = TempDir::new().expect("temp dir");
        let storage = FsObjectStorage::new(dir.path());

        assert!(matches!(
            storage.ensure_bucket("../escape"),
            Err(StorageError::InvalidBucket(_))
        ));
    }
}
