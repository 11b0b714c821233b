use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Outcome of one pass over the output directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Deletes generated audio files once they are older than the retention window
pub struct AudioCleanup {
    output_dir: PathBuf,
    retention: Duration,
}

impl AudioCleanup {
    pub fn new(output_dir: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            output_dir: output_dir.into(),
            retention,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run one sweep against the current time
    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(SystemTime::now()).await
    }

    /// Run one sweep, treating `now` as the current time.
    ///
    /// Errors never escape: an unreadable directory ends the sweep, an entry
    /// that cannot be inspected or removed is counted as failed and skipped.
    pub async fn sweep_at(&self, now: SystemTime) -> SweepReport {
        self.sweep_with(now, |path| tokio::fs::remove_file(path)).await
    }

    async fn sweep_with<F, Fut>(&self, now: SystemTime, remove: F) -> SweepReport
    where
        F: Fn(PathBuf) -> Fut,
        Fut: Future<Output = std::io::Result<()>>,
    {
        let mut report = SweepReport::default();

        let mut entries = match tokio::fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    dir = %self.output_dir.display(),
                    "Error cleaning up old files: cannot read output directory"
                );
                return report;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        dir = %self.output_dir.display(),
                        "Error cleaning up old files: directory listing interrupted"
                    );
                    report.failed += 1;
                    break;
                }
            };

            let path = entry.path();
            report.scanned += 1;

            let metadata = match entry_metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Cannot stat audio file");
                    report.failed += 1;
                    continue;
                }
            };

            if !(metadata.is_file() || metadata.is_symlink()) {
                continue;
            }

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Cannot read modification time");
                    report.failed += 1;
                    continue;
                }
            };

            // A modification time in the future counts as brand new
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age <= self.retention {
                continue;
            }

            match remove(path.clone()).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Deleted stale audio file");
                    report.deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Cannot delete stale audio file");
                    report.failed += 1;
                }
            }
        }

        if report.deleted > 0 || report.failed > 0 {
            tracing::info!(
                dir = %self.output_dir.display(),
                scanned = report.scanned,
                deleted = report.deleted,
                failed = report.failed,
                "Audio cleanup sweep finished"
            );
        }

        report
    }

    /// Sweep now, then once every `every`, on a background task
    pub fn spawn(self, every: Duration) -> JoinHandle<()> {
        // tokio panics on a zero period
        let every = every.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.sweep().await;
            }
        })
    }
}

/// Metadata used to age an entry. Symlinks are followed so a link is aged
/// like its target; a dangling link is aged by the link itself. Either way
/// the link, not the target, is what gets removed.
async fn entry_metadata(path: &Path) -> std::io::Result<std::fs::Metadata> {
    match tokio::fs::metadata(path).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tokio::fs::symlink_metadata(path).await
        }
        result => result,
    }
}
