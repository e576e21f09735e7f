//! The cache synchronization pipeline.
//!
//! Implements the sync policy over injected collaborators: probe the cache
//! file for corruption, apply the offline policy, compare the remote
//! `Last-Modified` timestamp against the cache file's modification time,
//! and only then download, verify, extract, and atomically promote the new
//! database. A failed fetch degrades to the previously cached file when one
//! exists; a failed promotion never leaves a partial file at the canonical
//! path.
//!
//! The cache directory is single-writer; callers serialize syncs with
//! [`crate::lock::CacheLock`].

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

use crate::archive::{ArchiveExtractor, ExtractionError, TarGzExtractor};
use crate::cache::CacheEntry;
use crate::error::{Result, SyncError};
use crate::remote::checksum::compute_sha256;
use crate::remote::download::{DownloadError, GeoIpDownloader, HttpDownloader};
use crate::remote::endpoint::DownloadRequest;
use crate::validate::{DatabaseValidator, MmdbValidator};

/// Caller policy for one sync.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Delete any cached copy and fetch unconditionally.
    pub force: bool,
    /// Permit no network access; use the cache as-is or fail.
    pub offline: bool,
    /// Fail instead of completing without performing an update.
    pub fail_on_no_op: bool,
    /// Verify the archive against its SHA-256 sidecar when one exists.
    pub verify_checksum: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            offline: false,
            fail_on_no_op: false,
            verify_checksum: true,
        }
    }
}

/// What a successful sync actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// A new database was downloaded and promoted into the cache.
    Downloaded,
    /// The remote copy is not newer; the cache file was returned unchanged.
    UpToDate,
    /// Offline mode: the cache file was returned without a freshness check.
    OfflineUnverified,
    /// The fetch failed but a previously cached file was returned.
    StaleFallback,
}

/// The result of a successful sync: a valid cache file and how it got
/// there.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The canonical cache file path.
    pub path: Utf8PathBuf,
    /// What the sync did to produce it.
    pub action: SyncAction,
}

/// Internal error type for the fetch stage.
///
/// Not exported: when a prior cache file exists every variant degrades to
/// [`SyncAction::StaleFallback`], otherwise it surfaces as
/// [`SyncError::FetchFailed`].
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("checksum mismatch: sidecar={expected}, archive={actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("archive does not contain {filename}")]
    DatabaseNotInArchive { filename: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The synchronizer, generic over its collaborators so tests can inject
/// mocks for the network, the extractor, and the validity probe.
pub struct Synchronizer<'a> {
    downloader: &'a dyn GeoIpDownloader,
    extractor: &'a dyn ArchiveExtractor,
    validator: &'a dyn DatabaseValidator,
}

/// Synchronize using the production HTTP downloader, tar.gz extractor, and
/// MaxMind DB validator.
///
/// # Errors
///
/// See [`Synchronizer::sync`].
pub fn sync_with_defaults(
    request: &DownloadRequest,
    cache_dir: &Utf8Path,
    options: &SyncOptions,
) -> Result<SyncOutcome> {
    Synchronizer::new(&HttpDownloader, &TarGzExtractor, &MmdbValidator)
        .sync(request, cache_dir, options)
}

impl<'a> Synchronizer<'a> {
    /// Create a synchronizer over the given collaborators.
    #[must_use]
    pub fn new(
        downloader: &'a dyn GeoIpDownloader,
        extractor: &'a dyn ArchiveExtractor,
        validator: &'a dyn DatabaseValidator,
    ) -> Self {
        Self {
            downloader,
            extractor,
            validator,
        }
    }

    /// Ensure the cache holds a valid, up-to-date copy of the requested
    /// database and return its canonical path.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::OfflineUnavailable`] when offline mode forbids
    /// a required refresh, [`SyncError::NoOpNotAllowed`] when offline mode
    /// would no-op against the caller's policy, [`SyncError::FetchFailed`]
    /// when the download or extraction fails with no cached copy to fall
    /// back on, and [`SyncError::PromotionFailed`] when the extracted
    /// database cannot be moved into place.
    pub fn sync(
        &self,
        request: &DownloadRequest,
        cache_dir: &Utf8Path,
        options: &SyncOptions,
    ) -> Result<SyncOutcome> {
        let entry = CacheEntry::for_edition(cache_dir, request.edition());

        // Corruption self-check: a cache file that fails the structural
        // probe forces a refresh regardless of the caller's flag.
        let mut force = options.force;
        if entry.exists()
            && !force
            && let Err(e) = self.validator.validate(entry.path())
        {
            warn!("cache file {} failed validation ({e}); forcing refresh", entry.path());
            force = true;
        }

        if options.offline {
            return resolve_offline(&entry, force, options.fail_on_no_op);
        }

        // A failed probe leaves the timestamp unknown rather than aborting;
        // the download attempt that follows decides the outcome.
        let remote_modified = match self.downloader.last_modified(request) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                debug!("freshness probe failed for {request}: {e}");
                None
            }
        };

        if force {
            if entry.exists() {
                entry.remove()?;
            }
        } else if entry.exists()
            && let Some(remote) = remote_modified
            && !entry.is_stale_against(remote)
        {
            debug!("{} is up-to-date", entry.path());
            return Ok(SyncOutcome {
                path: entry.path().to_owned(),
                action: SyncAction::UpToDate,
            });
        }

        std::fs::create_dir_all(cache_dir.as_std_path())?;
        let had_previous = entry.exists();

        let (temp_dir, extracted) = match self.fetch_and_extract(request, cache_dir, options) {
            Ok(result) => result,
            Err(e) if had_previous => {
                warn!("unable to update {} ({e}); keeping cached copy", entry.path());
                return Ok(SyncOutcome {
                    path: entry.path().to_owned(),
                    action: SyncAction::StaleFallback,
                });
            }
            Err(e) => {
                return Err(SyncError::FetchFailed {
                    reason: e.to_string(),
                });
            }
        };

        entry.promote_from(&extracted, remote_modified)?;
        if let Err(e) = temp_dir.close() {
            warn!("could not remove extraction directory: {e}");
        }

        Ok(SyncOutcome {
            path: entry.path().to_owned(),
            action: SyncAction::Downloaded,
        })
    }

    /// Download, optionally verify, and extract the archive into a scratch
    /// directory inside `cache_dir`, returning the extracted database path.
    ///
    /// The scratch directory lives inside the cache directory so the later
    /// promotion is a same-filesystem atomic rename.
    fn fetch_and_extract(
        &self,
        request: &DownloadRequest,
        cache_dir: &Utf8Path,
        options: &SyncOptions,
    ) -> std::result::Result<(tempfile::TempDir, Utf8PathBuf), FetchError> {
        let temp_dir = tempfile::Builder::new()
            .prefix(".geolite2-sync-")
            .tempdir_in(cache_dir.as_std_path())?;
        let archive_path = temp_dir.path().join(request.archive_filename());

        debug!("downloading {request}");
        self.downloader.download_archive(request, &archive_path)?;

        if options.verify_checksum
            && let Some(expected) = self.downloader.download_checksum(request)?
        {
            let actual = compute_sha256(&archive_path)?;
            if actual != expected {
                return Err(FetchError::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        let extract_dir = temp_dir.path().join("extracted");
        std::fs::create_dir_all(&extract_dir)?;
        let entries = self.extractor.extract(&archive_path, &extract_dir)?;

        let wanted = request.edition().database_filename();
        let database = entries
            .into_iter()
            .find(|path| path.file_name() == Some(wanted.as_str()))
            .ok_or(FetchError::DatabaseNotInArchive { filename: wanted })?;

        Ok((temp_dir, database))
    }
}

/// Apply the offline policy to the current cache state.
fn resolve_offline(entry: &CacheEntry, force: bool, fail_on_no_op: bool) -> Result<SyncOutcome> {
    if force {
        return Err(SyncError::OfflineUnavailable {
            reason: "a forced refresh needs the network".to_owned(),
        });
    }
    if !entry.exists() {
        return Err(SyncError::OfflineUnavailable {
            reason: "no cached copy exists".to_owned(),
        });
    }
    if fail_on_no_op {
        return Err(SyncError::NoOpNotAllowed);
    }
    warn!("offline mode: using {} without verifying freshness", entry.path());
    Ok(SyncOutcome {
        path: entry.path().to_owned(),
        action: SyncAction::OfflineUnverified,
    })
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
