//! Pluggable structural validity probe for cached database files.
//!
//! A cache file that exists but cannot be opened as a database is treated
//! as corrupt, and corruption always triggers a redownload. The probe is a
//! trait so callers can substitute a validator for other formats, or a
//! stricter one that fully parses the file.

use camino::Utf8Path;
use std::io::{Read, Seek, SeekFrom};

/// Marker that precedes the metadata section of a MaxMind DB file.
const METADATA_MARKER: &[u8] = b"\xab\xcd\xefMaxMind.com";

/// The metadata section is specified to start within the last 128 KiB.
const METADATA_WINDOW: u64 = 128 * 1024;

/// Errors describing why a cache file failed the validity probe.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The file could not be read.
    #[error("validation I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is empty.
    #[error("{path} is empty")]
    Empty {
        /// The file that was probed.
        path: String,
    },

    /// The file carries no metadata marker and is not a MaxMind DB.
    #[error("{path} has no MaxMind DB metadata section")]
    MissingMetadata {
        /// The file that was probed.
        path: String,
    },
}

/// Trait for probing a cached database file for structural validity.
#[cfg_attr(test, mockall::automock)]
pub trait DatabaseValidator {
    /// Check whether the file at `path` is structurally a valid database.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing why the file is not valid.
    fn validate(&self, path: &Utf8Path) -> Result<(), ValidationError>;
}

/// Default validator for the MaxMind DB (`.mmdb`) binary format.
///
/// Performs a structural probe rather than a full parse: the file must be
/// non-empty and contain the metadata start marker within its trailing
/// window, which is where every well-formed database carries it.
pub struct MmdbValidator;

impl DatabaseValidator for MmdbValidator {
    fn validate(&self, path: &Utf8Path) -> Result<(), ValidationError> {
        let mut file = std::fs::File::open(path.as_std_path())?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Err(ValidationError::Empty {
                path: path.to_string(),
            });
        }

        let window = len.min(METADATA_WINDOW);
        file.seek(SeekFrom::End(-(window as i64)))?;
        let mut tail = Vec::with_capacity(window as usize);
        file.read_to_end(&mut tail)?;

        if contains_marker(&tail) {
            Ok(())
        } else {
            Err(ValidationError::MissingMetadata {
                path: path.to_string(),
            })
        }
    }
}

/// Search `haystack` for the metadata marker.
fn contains_marker(haystack: &[u8]) -> bool {
    haystack
        .windows(METADATA_MARKER.len())
        .any(|w| w == METADATA_MARKER)
}

/// A minimal byte string that passes the structural probe, for tests.
#[cfg(test)]
pub(crate) fn valid_database_bytes() -> Vec<u8> {
    let mut bytes = b"binary search tree section".to_vec();
    bytes.extend_from_slice(METADATA_MARKER);
    bytes.extend_from_slice(b"\xe0metadata map");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_file(contents: &[u8]) -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("probe.mmdb"))
            .expect("UTF-8 temp path");
        std::fs::write(&path, contents).expect("write");
        (dir, path)
    }

    #[test]
    fn accepts_file_with_metadata_marker() {
        let (_dir, path) = temp_file(&valid_database_bytes());
        assert!(MmdbValidator.validate(&path).is_ok());
    }

    #[test]
    fn rejects_empty_file() {
        let (_dir, path) = temp_file(b"");
        let result = MmdbValidator.validate(&path);
        assert!(matches!(result, Err(ValidationError::Empty { .. })));
    }

    #[test]
    fn rejects_file_without_marker() {
        let (_dir, path) = temp_file(b"<html>429 Too Many Requests</html>");
        let result = MmdbValidator.validate(&path);
        assert!(matches!(
            result,
            Err(ValidationError::MissingMetadata { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.mmdb"))
            .expect("UTF-8 temp path");
        let result = MmdbValidator.validate(&path);
        assert!(matches!(result, Err(ValidationError::Io(_))));
    }

    #[test]
    fn finds_marker_in_large_tail_window() {
        let mut contents = vec![0u8; 200 * 1024];
        let marker_at = contents.len() - 64 * 1024;
        contents.splice(marker_at..marker_at, valid_database_bytes());
        let (_dir, path) = temp_file(&contents);
        assert!(MmdbValidator.validate(&path).is_ok());
    }
}
