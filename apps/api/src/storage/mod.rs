//! Filesystem-backed artifact store.
//!
//! Generated CVs live in a flat directory. Three parties touch it: the CV
//! generator writes, the download handler reads, the retention scheduler
//! deletes. There is no locking; an existence check at read time is the
//! only synchronization, and a lost race surfaces as `NotFound`.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored artifact as seen by the retention scheduler.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub created_at: SystemTime,
}

impl StoredFile {
    /// Age in hours relative to `now`. Files with timestamps in the future
    /// (clock skew) count as age zero.
    pub fn age_hours(&self, now: SystemTime) -> f64 {
        now.duration_since(self.created_at)
            .map(|d| d.as_secs_f64() / 3600.0)
            .unwrap_or(0.0)
    }
}

/// The file store the CV handlers and the retention scheduler share.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Lists regular files in `dir` with the given extension (no dot).
    async fn list(&self, dir: &Path, extension: &str) -> Result<Vec<StoredFile>, StorageError>;

    async fn delete(&self, path: &Path) -> Result<(), StorageError>;

    async fn write(&self, path: &Path, bytes: Bytes) -> Result<(), StorageError>;

    async fn read(&self, path: &Path) -> Result<Bytes, StorageError>;
}

/// `Storage` over the local filesystem via `tokio::fs`.
pub struct FsStorage;

#[async_trait]
impl Storage for FsStorage {
    async fn list(&self, dir: &Path, extension: &str) -> Result<Vec<StoredFile>, StorageError> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            // Not every filesystem reports a birth time; fall back to mtime.
            let created_at = metadata.created().or_else(|_| metadata.modified())?;
            files.push(StoredFile { path, created_at });
        }
        Ok(files)
    }

    async fn delete(&self, path: &Path) -> Result<(), StorageError> {
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    async fn write(&self, path: &Path, bytes: Bytes) -> Result<(), StorageError> {
        tokio::fs::write(path, &bytes).await?;
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Bytes, StorageError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_write_list_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv_test.pdf");

        FsStorage
            .write(&path, Bytes::from_static(b"%PDF-stub"))
            .await
            .unwrap();

        let files = FsStorage.list(dir.path(), "pdf").await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, path);

        let bytes = FsStorage.read(&path).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-stub");

        FsStorage.delete(&path).await.unwrap();
        assert!(FsStorage.list(dir.path(), "pdf").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        FsStorage
            .write(&dir.path().join("a.pdf"), Bytes::from_static(b"a"))
            .await
            .unwrap();
        FsStorage
            .write(&dir.path().join("b.txt"), Bytes::from_static(b"b"))
            .await
            .unwrap();

        let files = FsStorage.list(dir.path(), "pdf").await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("a.pdf"));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStorage
            .read(&dir.path().join("missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn test_age_hours() {
        let now = SystemTime::now();
        let file = StoredFile {
            path: PathBuf::from("x.pdf"),
            created_at: now - Duration::from_secs(2 * 3600),
        };
        assert!((file.age_hours(now) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_hours_future_timestamp_is_zero() {
        let now = SystemTime::now();
        let file = StoredFile {
            path: PathBuf::from("x.pdf"),
            created_at: now + Duration::from_secs(60),
        };
        assert_eq!(file.age_hours(now), 0.0);
    }
}
