//! Advisory locking for the cache directory.
//!
//! The cache directory has a single-writer discipline: concurrent syncs
//! against the same directory would race on the canonical file and the
//! extraction scratch space. An exclusive advisory lock on a well-known
//! file inside the directory makes that discipline explicit. The lock is
//! released when the guard is dropped.

use crate::error::{Result, SyncError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;

/// Name of the lock file inside the cache directory.
const LOCK_FILE_NAME: &str = ".geolite2-sync.lock";

/// Guard holding the exclusive lock on a cache directory.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use geolite2_sync::lock::CacheLock;
///
/// let _guard = CacheLock::acquire(Utf8Path::new("/var/cache/geolite2-sync"))?;
/// // ... sync while holding the lock ...
/// # Ok::<(), geolite2_sync::error::SyncError>(())
/// ```
#[derive(Debug)]
pub struct CacheLock {
    file: File,
    path: Utf8PathBuf,
}

impl CacheLock {
    /// Acquire an exclusive advisory lock on `cache_dir`, blocking until
    /// any other holder releases it.
    ///
    /// Creates the directory and the lock file if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::LockFailed`] if the lock file cannot be created
    /// or the lock cannot be taken.
    pub fn acquire(cache_dir: &Utf8Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir.as_std_path())?;
        let path = cache_dir.join(LOCK_FILE_NAME);
        let file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.as_std_path())
            .map_err(|e| SyncError::LockFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        fs2::FileExt::lock_exclusive(&file).map_err(|e| SyncError::LockFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { file, path })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        // Best-effort release; the OS also drops the lock on close.
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp path");
        (dir, path)
    }

    #[test]
    fn acquire_creates_the_directory_and_lock_file() {
        let (_dir, base) = cache_dir();
        let cache = base.join("nested/cache");

        let guard = CacheLock::acquire(&cache).expect("acquire");
        assert!(guard.path().as_std_path().exists());
        assert_eq!(guard.path().file_name(), Some(LOCK_FILE_NAME));
    }

    #[test]
    fn second_acquire_fails_while_guard_is_held() {
        let (_dir, cache) = cache_dir();
        let guard = CacheLock::acquire(&cache).expect("acquire");

        let lock_path = cache.join(LOCK_FILE_NAME);
        let probe = File::options()
            .write(true)
            .open(lock_path.as_std_path())
            .expect("open lock file");
        assert!(fs2::FileExt::try_lock_exclusive(&probe).is_err());

        drop(guard);
        assert!(fs2::FileExt::try_lock_exclusive(&probe).is_ok());
    }
}
