//! On-disk cache entry state and atomic promotion.
//!
//! A cache entry is the canonical `{cache_dir}/{edition}.mmdb` file. This
//! module reads its modification time for freshness comparison and promotes
//! a freshly extracted database into the canonical path with an atomic
//! rename, stamping the remote timestamp onto the promoted file.

use crate::edition::Edition;
use crate::error::{Result, SyncError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

/// The canonical cache file for one edition.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    path: Utf8PathBuf,
}

impl CacheEntry {
    /// The canonical cache entry for `edition` under `cache_dir`.
    #[must_use]
    pub fn for_edition(cache_dir: &Utf8Path, edition: Edition) -> Self {
        Self {
            path: cache_dir.join(edition.database_filename()),
        }
    }

    /// The canonical cache file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the cache file currently exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.as_std_path().is_file()
    }

    /// The cache file's recorded modification time, when readable.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(self.path.as_std_path())
            .and_then(|m| m.modified())
            .ok()
    }

    /// Whether the remote copy is newer than the cache file.
    ///
    /// Compared at second granularity since HTTP dates carry no sub-second
    /// precision. An unreadable local timestamp counts as stale.
    #[must_use]
    pub fn is_stale_against(&self, remote_modified: SystemTime) -> bool {
        match self.modified() {
            Some(local) => epoch_seconds(remote_modified) > epoch_seconds(local),
            None => true,
        }
    }

    /// Remove the cache file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be deleted.
    pub fn remove(&self) -> Result<()> {
        fs::remove_file(self.path.as_std_path())?;
        Ok(())
    }

    /// Atomically rename `source` into the canonical path and stamp it with
    /// `remote_modified` when known.
    ///
    /// The rename is atomic on the same filesystem; callers must place
    /// `source` inside the cache directory. If stamping fails after the
    /// rename, the canonical file is removed before the error propagates,
    /// so the canonical path never holds a file with a misleading
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::PromotionFailed`] on any failure.
    pub fn promote_from(
        &self,
        source: &Utf8Path,
        remote_modified: Option<SystemTime>,
    ) -> Result<()> {
        fs::rename(source.as_std_path(), self.path.as_std_path()).map_err(|e| {
            SyncError::PromotionFailed {
                path: self.path.clone(),
                reason: format!("rename from {source} failed: {e}"),
            }
        })?;

        if let Some(timestamp) = remote_modified
            && let Err(e) = self.set_modified(timestamp)
        {
            let _ = fs::remove_file(self.path.as_std_path());
            return Err(SyncError::PromotionFailed {
                path: self.path.clone(),
                reason: format!("setting modification time failed: {e}"),
            });
        }

        Ok(())
    }

    fn set_modified(&self, timestamp: SystemTime) -> std::io::Result<()> {
        let file = fs::File::options()
            .write(true)
            .open(self.path.as_std_path())?;
        file.set_modified(timestamp)
    }
}

/// Whole seconds since the Unix epoch, saturating at zero for pre-epoch
/// timestamps.
fn epoch_seconds(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
