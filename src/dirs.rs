//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind a small trait so the default cache
//! directory can be substituted in tests without touching the real home
//! directory.

use camino::Utf8PathBuf;
use directories_next::ProjectDirs;

/// Trait providing the platform base directories the tool needs.
pub trait BaseDirs {
    /// Per-user cache directory for this tool, if one can be determined.
    fn cache_dir(&self) -> Option<Utf8PathBuf>;
}

/// Production implementation backed by `directories-next`.
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn cache_dir(&self) -> Option<Utf8PathBuf> {
        ProjectDirs::from("", "", "geolite2-sync")
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.cache_dir().to_path_buf()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_cache_dir_names_the_tool() {
        // Skip in environments without a home directory (e.g. bare CI containers).
        let Some(dir) = SystemBaseDirs.cache_dir() else {
            return;
        };
        assert!(dir.as_str().contains("geolite2-sync"));
    }
}
