use crate::Result;
use fs4::fs_std::FileExt;
use ohno::IntoAppError;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

const LOG_TARGET: &str = "     cache";

/// Name of the lock file kept at the root of the cache directory.
pub const LOCK_FILE_NAME: &str = "cache.lock";

/// Guard that releases the cache lock when dropped
#[derive(Debug)]
pub struct CacheLockGuard(File);

impl Drop for CacheLockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.unlock() {
            log::warn!(target: LOG_TARGET, "Could not unlock cache: {e:#}");
        }
    }
}

/// Acquire an exclusive advisory lock on the cache directory, creating it if needed.
///
/// Every read-modify and write of a cache entry happens while this guard is held,
/// which serializes writers within this process and across processes.
pub async fn acquire_cache_lock(cache_dir: &Path) -> Result<CacheLockGuard> {
    fs::create_dir_all(cache_dir).into_app_err_with(|| format!("creating cache directory '{}'", cache_dir.display()))?;
    let lock_path = cache_dir.join(LOCK_FILE_NAME);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .into_app_err_with(|| format!("opening cache lock file at '{}'", lock_path.display()))?;

    // Blocking on the lock must not stall the async runtime
    let file = tokio::task::spawn_blocking(move || {
        file.lock_exclusive()
            .into_app_err_with(|| format!("acquiring exclusive lock on cache at '{}'", lock_path.display()))?;
        log::trace!(target: LOG_TARGET, "Acquired cache lock at '{}'", lock_path.display());
        Ok::<_, ohno::AppError>(file)
    })
    .await
    .into_app_err("lock task panicked")??;

    Ok(CacheLockGuard(file))
}
