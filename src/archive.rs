//! Gzip-compressed tar extraction with path traversal protection.
//!
//! Extracts `.tar.gz` archives into a destination directory and returns the
//! exact paths of the regular files that were written, so callers never
//! need to rediscover extracted entries by scanning the directory.

use camino::Utf8PathBuf;
use std::path::{Component, Path};

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// An archive entry path was not valid UTF-8.
    #[error("archive entry path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The archive contains no regular files.
    #[error("archive contains no files")]
    EmptyArchive,
}

/// Trait for extracting artifact archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Directory entries are skipped; the returned paths are the regular
    /// files that were written, rooted under `dest_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the destination directory, [`ExtractionError::EmptyArchive`]
    /// if no regular files are found, and [`ExtractionError::Io`] on I/O
    /// failures.
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<Utf8PathBuf>, ExtractionError>;
}

/// Default extractor using `flate2` and `tar`.
///
/// Validates each entry path before extraction to guard against path
/// traversal attacks (zip-slip).
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> Result<Vec<Utf8PathBuf>, ExtractionError> {
        let file = std::fs::File::open(archive_path)?;
        let decoder = flate2::read::GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);
        let mut extracted = Vec::new();

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            if entry.header().entry_type().is_dir() {
                continue;
            }
            let entry_path = entry.path()?.into_owned();

            validate_entry_path(&entry_path)?;

            let dest_path = dest_dir.join(&entry_path);
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            entry.unpack(&dest_path)?;

            let utf8 = Utf8PathBuf::from_path_buf(dest_path).map_err(|p| {
                ExtractionError::NonUtf8Path {
                    path: p.display().to_string(),
                }
            })?;
            extracted.push(utf8);
        }

        if extracted.is_empty() {
            return Err(ExtractionError::EmptyArchive);
        }

        Ok(extracted)
    }
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}
