//! Publishing a synchronized database into a destination directory.
//!
//! The original build-tool integration copied the cache file into a project
//! resource directory after each sync. The CLI keeps the copy step: the
//! cache stays authoritative and the destination receives a replaceable
//! snapshot.

use crate::error::{Result, SyncError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Copy `cache_file` into `dest_dir`, replacing any existing copy.
///
/// Creates the destination directory if needed and returns the path of the
/// published file.
///
/// # Errors
///
/// Returns [`SyncError::PublishFailed`] if the directory cannot be created
/// or the copy fails.
pub fn publish(cache_file: &Utf8Path, dest_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let file_name = cache_file
        .file_name()
        .ok_or_else(|| SyncError::PublishFailed {
            dest: dest_dir.to_owned(),
            reason: format!("cache path {cache_file} has no file name"),
        })?;

    fs::create_dir_all(dest_dir.as_std_path()).map_err(|e| SyncError::PublishFailed {
        dest: dest_dir.to_owned(),
        reason: format!("could not create directory: {e}"),
    })?;

    let dest_path = dest_dir.join(file_name);
    fs::copy(cache_file.as_std_path(), dest_path.as_std_path()).map_err(|e| {
        SyncError::PublishFailed {
            dest: dest_dir.to_owned(),
            reason: format!("could not copy {cache_file}: {e}"),
        }
    })?;

    Ok(dest_path)
}
