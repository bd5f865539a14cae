//! Retention policy for generated CV files.
//!
//! A recurring background task scans the storage directory and deletes
//! files that are too old or that push the directory over its count bound.
//! The decision walk is a pure function so tests can drive cycles without
//! touching a clock or a filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::storage::{Storage, StorageError, StoredFile};

/// Age/count rule governing which stored files are deleted. Built from
/// config at startup, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    pub max_age_hours: f64,
    pub max_count: usize,
    pub interval: Duration,
}

/// Walks files oldest-first and selects every file violating the policy.
///
/// A file is selected when its age exceeds `max_age_hours` OR when the
/// count of files not yet selected still exceeds `max_count` — either
/// condition alone is sufficient.
pub fn select_expired(
    files: &[StoredFile],
    now: SystemTime,
    policy: &RetentionPolicy,
) -> Vec<PathBuf> {
    let mut sorted: Vec<&StoredFile> = files.iter().collect();
    sorted.sort_by_key(|f| f.created_at);

    let mut selected = Vec::new();
    for file in sorted {
        let remaining = files.len() - selected.len();
        if file.age_hours(now) > policy.max_age_hours || remaining > policy.max_count {
            selected.push(file.path.clone());
        }
    }
    selected
}

/// Runs one retention cycle: scan, decide, delete.
///
/// Deletion is best-effort per file — a failed delete is logged and the
/// rest of the batch still runs. Returns the number of files deleted.
pub async fn run_cycle(
    storage: &dyn Storage,
    dir: &Path,
    policy: &RetentionPolicy,
) -> Result<usize, StorageError> {
    let files = storage.list(dir, "pdf").await?;
    let expired = select_expired(&files, SystemTime::now(), policy);

    let mut deleted = 0usize;
    for path in expired {
        match storage.delete(&path).await {
            Ok(()) => {
                deleted += 1;
                info!("deleted old/excess CV file: {}", path.display());
            }
            Err(e) => error!("error deleting file {}: {e}", path.display()),
        }
    }
    Ok(deleted)
}

/// The recurring cleanup task. Each cycle waits the full interval after
/// the previous cycle completes, so cycles never overlap; a slow cycle
/// simply delays the next one.
pub struct RetentionScheduler {
    storage: Arc<dyn Storage>,
    dir: PathBuf,
    policy: RetentionPolicy,
    cancel: CancellationToken,
}

impl RetentionScheduler {
    pub fn new(storage: Arc<dyn Storage>, dir: PathBuf, policy: RetentionPolicy) -> Self {
        Self {
            storage,
            dir,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Token for shutting the scheduler down at process exit. An in-flight
    /// cycle finishes before the task stops.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Starts the background task. Scan failures are logged and never stop
    /// the schedule — the next cycle always runs.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "CV cleanup scheduler started, runs every {}s",
                self.policy.interval.as_secs()
            );
            loop {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        info!("CV cleanup scheduler stopped");
                        return;
                    }
                    _ = tokio::time::sleep(self.policy.interval) => {}
                }

                match run_cycle(self.storage.as_ref(), &self.dir, &self.policy).await {
                    Ok(deleted) => info!("CV cleanup complete, deleted {deleted} files"),
                    Err(e) => error!("error during CV cleanup: {e}"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn policy(max_age_hours: f64, max_count: usize) -> RetentionPolicy {
        RetentionPolicy {
            max_age_hours,
            max_count,
            interval: Duration::from_secs(1),
        }
    }

    fn file(name: &str, age_hours: f64, now: SystemTime) -> StoredFile {
        StoredFile {
            path: PathBuf::from(name),
            created_at: now - Duration::from_secs_f64(age_hours * 3600.0),
        }
    }

    /// In-memory store: configurable listing failure, per-path delete
    /// failure, and call counters.
    #[derive(Default)]
    struct MockStorage {
        files: Mutex<Vec<StoredFile>>,
        deleted: Mutex<Vec<PathBuf>>,
        fail_list: bool,
        fail_delete_for: Option<PathBuf>,
        list_calls: AtomicUsize,
    }

    #[async_trait]
    impl Storage for MockStorage {
        async fn list(&self, _dir: &Path, _ext: &str) -> Result<Vec<StoredFile>, StorageError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(StorageError::Io(std::io::Error::other("listing failed")));
            }
            Ok(self.files.lock().unwrap().clone())
        }

        async fn delete(&self, path: &Path) -> Result<(), StorageError> {
            if self.fail_delete_for.as_deref() == Some(path) {
                return Err(StorageError::Io(std::io::Error::other("delete failed")));
            }
            self.deleted.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        async fn write(&self, _path: &Path, _bytes: Bytes) -> Result<(), StorageError> {
            Ok(())
        }

        async fn read(&self, path: &Path) -> Result<Bytes, StorageError> {
            Err(StorageError::NotFound(path.to_path_buf()))
        }
    }

    #[test]
    fn test_only_overage_file_selected() {
        let now = SystemTime::now();
        let files = vec![
            file("a.pdf", 1.0, now),
            file("b.pdf", 30.0, now),
            file("c.pdf", 2.0, now),
        ];
        let selected = select_expired(&files, now, &policy(24.0, 100));
        assert_eq!(selected, vec![PathBuf::from("b.pdf")]);
    }

    #[test]
    fn test_count_overflow_deletes_oldest_fifty() {
        let now = SystemTime::now();
        // 150 files, all aged 1h, oldest first by construction.
        let files: Vec<StoredFile> = (0..150)
            .map(|i| StoredFile {
                path: PathBuf::from(format!("cv_{i:03}.pdf")),
                created_at: now - Duration::from_secs(3600 + (150 - i) as u64),
            })
            .collect();
        let selected = select_expired(&files, now, &policy(24.0, 100));
        assert_eq!(selected.len(), 50);
        // The oldest 50 are the lowest indices.
        for (i, path) in selected.iter().enumerate() {
            assert_eq!(path, &PathBuf::from(format!("cv_{i:03}.pdf")));
        }
    }

    #[test]
    fn test_age_and_count_conditions_are_independent() {
        let now = SystemTime::now();
        // Three files over the count bound of 2; only one is also over-age.
        let files = vec![
            file("old.pdf", 30.0, now),
            file("mid.pdf", 2.0, now),
            file("new.pdf", 1.0, now),
        ];
        let selected = select_expired(&files, now, &policy(24.0, 2));
        // old.pdf via either condition, then remaining drops to 2.
        assert_eq!(selected, vec![PathBuf::from("old.pdf")]);
    }

    #[test]
    fn test_nothing_selected_within_policy() {
        let now = SystemTime::now();
        let files = vec![file("a.pdf", 1.0, now), file("b.pdf", 2.0, now)];
        assert!(select_expired(&files, now, &policy(24.0, 100)).is_empty());
    }

    #[tokio::test]
    async fn test_cycle_continues_past_failed_delete() {
        let now = SystemTime::now();
        let storage = MockStorage {
            files: Mutex::new(vec![
                file("a.pdf", 30.0, now),
                file("b.pdf", 40.0, now),
                file("c.pdf", 50.0, now),
            ]),
            fail_delete_for: Some(PathBuf::from("b.pdf")),
            ..Default::default()
        };
        let deleted = run_cycle(&storage, Path::new("ignored"), &policy(24.0, 100))
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        let survivors = storage.deleted.lock().unwrap();
        assert!(survivors.contains(&PathBuf::from("a.pdf")));
        assert!(survivors.contains(&PathBuf::from("c.pdf")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_reschedules_after_listing_error() {
        let storage = Arc::new(MockStorage {
            fail_list: true,
            ..Default::default()
        });
        let scheduler =
            RetentionScheduler::new(storage.clone(), PathBuf::from("ignored"), policy(24.0, 100));
        let cancel = scheduler.cancellation_token();
        let handle = scheduler.spawn();

        // Three intervals elapse; every cycle's scan fails, yet each
        // subsequent cycle still runs.
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(storage.list_calls.load(Ordering::SeqCst) >= 3);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_scheduler() {
        let storage = Arc::new(MockStorage::default());
        let scheduler =
            RetentionScheduler::new(storage.clone(), PathBuf::from("ignored"), policy(24.0, 100));
        let cancel = scheduler.cancellation_token();
        let handle = scheduler.spawn();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        cancel.cancel();
        handle.await.unwrap();

        let calls = storage.list_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(storage.list_calls.load(Ordering::SeqCst), calls);
    }
}
