//! Error types for the GeoLite2 cache synchronizer.
//!
//! This module defines semantic error variants for every way a sync can
//! fail. Fatal variants map one-to-one onto the policy outcomes of the
//! pipeline: bad arguments, offline restrictions, fetch failures with no
//! prior cache, and promotion failures. The degraded stale-fallback path is
//! not an error and is reported through [`crate::sync::SyncAction`] instead.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while synchronizing a GeoLite2 database.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The requested edition name is not in the supported set.
    #[error("unsupported edition {name:?}; expected one of: {supported}")]
    UnsupportedEdition {
        /// The edition name that was requested.
        name: String,
        /// Comma-separated list of supported edition names.
        supported: String,
    },

    /// The requested archive suffix is not in the supported set.
    #[error("unsupported archive suffix {suffix:?}; expected one of: {supported}")]
    UnsupportedSuffix {
        /// The suffix that was requested.
        suffix: String,
        /// Comma-separated list of supported suffixes.
        supported: String,
    },

    /// A refresh requires the network, but offline mode is active.
    #[error("cannot resolve remote Last-Modified in offline mode: {reason}")]
    OfflineUnavailable {
        /// Why the cached copy could not be used as-is.
        reason: String,
    },

    /// Offline mode forbids any update, but the caller demanded one.
    #[error("refusing to no-op in offline mode (fail-on-no-op is set)")]
    NoOpNotAllowed,

    /// Download or extraction failed and no prior cache file exists.
    #[error("fetch failed with no cached copy to fall back on: {reason}")]
    FetchFailed {
        /// Description of the download or extraction failure.
        reason: String,
    },

    /// Moving the extracted database into its canonical path failed.
    ///
    /// The canonical path has been cleaned up; it never holds a partial
    /// file after this error.
    #[error("failed to promote {path} into the cache: {reason}")]
    PromotionFailed {
        /// The canonical cache path that was being written.
        path: Utf8PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Copying the cache file into the destination directory failed.
    #[error("failed to publish into {dest}: {reason}")]
    PublishFailed {
        /// The destination directory.
        dest: Utf8PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// No cache directory was given and the platform default is unknown.
    #[error("could not determine a cache directory; pass --cache-dir")]
    CacheDirUnavailable,

    /// The advisory lock on the cache directory could not be acquired.
    #[error("failed to lock cache directory via {path}: {reason}")]
    LockFailed {
        /// Path to the lock file.
        path: Utf8PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_edition_lists_alternatives() {
        let err = SyncError::UnsupportedEdition {
            name: "GeoLite2-Planet".to_owned(),
            supported: "GeoLite2-ASN, GeoLite2-City, GeoLite2-Country".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GeoLite2-Planet"));
        assert!(msg.contains("GeoLite2-City"));
    }

    #[test]
    fn offline_unavailable_includes_reason() {
        let err = SyncError::OfflineUnavailable {
            reason: "no cached copy exists".to_owned(),
        };
        assert!(err.to_string().contains("no cached copy exists"));
    }

    #[test]
    fn promotion_failed_names_the_canonical_path() {
        let err = SyncError::PromotionFailed {
            path: Utf8PathBuf::from("/cache/GeoLite2-City.mmdb"),
            reason: "rename failed".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GeoLite2-City.mmdb"));
        assert!(msg.contains("rename failed"));
    }

    #[test]
    fn lock_failed_names_the_lock_file() {
        let err = SyncError::LockFailed {
            path: Utf8PathBuf::from("/cache/.geolite2-sync.lock"),
            reason: "permission denied".to_owned(),
        };
        assert!(err.to_string().contains(".geolite2-sync.lock"));
    }
}
