//! Page-view counter persisted as decimal text.
//!
//! Writers hold the exclusive lock across the file write so the file never
//! goes backwards relative to the in-memory value.

use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct HitCounter {
    path: PathBuf,
    count: RwLock<u64>,
}

impl HitCounter {
    /// Load the counter from `path`.
    ///
    /// A missing or unreadable file starts the counter at zero.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let count = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match contents.trim().parse::<u64>() {
                Ok(count) => {
                    info!("current hits: {count}");
                    count
                }
                Err(err) => {
                    warn!(path = %path.display(), "failed to parse hits file: {err}");
                    0
                }
            },
            Err(err) => {
                warn!(path = %path.display(), "failed to read hits file: {err}");
                0
            }
        };

        Self::with_count(path, count)
    }

    #[must_use]
    pub fn with_count(path: PathBuf, count: u64) -> Self {
        Self {
            path,
            count: RwLock::new(count),
        }
    }

    /// Record one hit and flush it to disk, returning the new count.
    ///
    /// Write failures are logged; the in-memory count still advances.
    pub async fn record(&self) -> u64 {
        let mut count = self.count.write().await;
        *count += 1;
        if let Err(err) = tokio::fs::write(&self.path, format!("{}\n", *count)).await {
            error!(path = %self.path.display(), "error writing hits: {err}");
        }
        *count
    }

    pub async fn current(&self) -> u64 {
        *self.count.read().await
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn load_reads_existing_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits");
        std::fs::write(&path, "41\n").unwrap();

        let hits = HitCounter::load(&path).await;
        assert_eq!(hits.current().await, 41);
        assert_eq!(hits.record().await, 42);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "42\n");
    }

    #[tokio::test]
    async fn missing_or_garbage_file_starts_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let missing = HitCounter::load(dir.path().join("missing")).await;
        assert_eq!(missing.current().await, 0);

        let garbage_path = dir.path().join("garbage");
        std::fs::write(&garbage_path, "lots").unwrap();
        let garbage = HitCounter::load(&garbage_path).await;
        assert_eq!(garbage.current().await, 0);
    }

    #[tokio::test]
    async fn failed_write_still_counts() {
        let dir = tempfile::tempdir().unwrap();
        let hits = HitCounter::with_count(dir.path().join("no/such/dir/hits"), 5);
        assert_eq!(hits.record().await, 6);
        assert_eq!(hits.current().await, 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_hits_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits");
        std::fs::write(&path, "10\n").unwrap();
        let hits = Arc::new(HitCounter::load(&path).await);

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let hits = Arc::clone(&hits);
                tokio::spawn(async move { hits.record().await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(hits.current().await, 60);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "60\n");
    }
}
