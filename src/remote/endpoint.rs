//! Download URL construction for the MaxMind GeoIP endpoint.
//!
//! URLs embed the caller's license key as a query parameter, so anything
//! user-visible (logs, error messages, `Display`) must go through the
//! redacted form. Only the download functions themselves see the real URL.

use crate::edition::{ArchiveSuffix, Edition};
use std::fmt;

/// Base URL of the GeoIP download endpoint.
const DOWNLOAD_BASE: &str = "https://download.maxmind.com/app/geoip_download";

/// Placeholder substituted for the license key in redacted URLs.
const REDACTED_KEY: &str = "REDACTED";

/// A fully-specified download request: edition, archive suffix, and the
/// license key authorizing the transfer.
///
/// # Examples
///
/// ```
/// use geolite2_sync::edition::{ArchiveSuffix, Edition};
/// use geolite2_sync::remote::endpoint::DownloadRequest;
///
/// let request = DownloadRequest::new(Edition::City, ArchiveSuffix::TarGz, "secret".into());
/// assert!(request.archive_url().contains("license_key=secret"));
/// assert!(!request.to_string().contains("secret"));
/// ```
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    edition: Edition,
    suffix: ArchiveSuffix,
    license_key: String,
}

impl DownloadRequest {
    /// Create a request for the given edition and suffix.
    #[must_use]
    pub fn new(edition: Edition, suffix: ArchiveSuffix, license_key: String) -> Self {
        Self {
            edition,
            suffix,
            license_key,
        }
    }

    /// The requested edition.
    #[must_use]
    pub fn edition(&self) -> Edition {
        self.edition
    }

    /// The requested archive suffix.
    #[must_use]
    pub fn suffix(&self) -> ArchiveSuffix {
        self.suffix
    }

    /// The archive filename used for the temporary download, e.g.
    /// `GeoLite2-City.tar.gz`.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{}.{}", self.edition.as_str(), self.suffix.as_str())
    }

    /// The full download URL for the archive. Contains the license key;
    /// never log this value.
    #[must_use]
    pub fn archive_url(&self) -> String {
        self.url_with(&self.license_key, self.suffix.as_str())
    }

    /// The full download URL for the SHA-256 sidecar. Contains the license
    /// key; never log this value.
    #[must_use]
    pub fn checksum_url(&self) -> String {
        self.url_with(&self.license_key, &self.suffix.checksum_suffix())
    }

    /// The archive URL with the license key replaced, safe for logs and
    /// error messages.
    #[must_use]
    pub fn redacted_archive_url(&self) -> String {
        self.url_with(REDACTED_KEY, self.suffix.as_str())
    }

    /// The sidecar URL with the license key replaced, safe for logs and
    /// error messages.
    #[must_use]
    pub fn redacted_checksum_url(&self) -> String {
        self.url_with(REDACTED_KEY, &self.suffix.checksum_suffix())
    }

    fn url_with(&self, key: &str, suffix: &str) -> String {
        format!(
            "{DOWNLOAD_BASE}?edition_id={}&license_key={key}&suffix={suffix}",
            self.edition.as_str()
        )
    }
}

impl fmt::Display for DownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted_archive_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DownloadRequest {
        DownloadRequest::new(
            Edition::Country,
            ArchiveSuffix::TarGz,
            "hunter2".to_owned(),
        )
    }

    #[test]
    fn archive_url_carries_edition_key_and_suffix() {
        let url = request().archive_url();
        assert!(url.starts_with(DOWNLOAD_BASE));
        assert!(url.contains("edition_id=GeoLite2-Country"));
        assert!(url.contains("license_key=hunter2"));
        assert!(url.ends_with("suffix=tar.gz"));
    }

    #[test]
    fn checksum_url_requests_the_sidecar_suffix() {
        let url = request().checksum_url();
        assert!(url.ends_with("suffix=tar.gz.sha256"));
    }

    #[test]
    fn redacted_urls_never_contain_the_key() {
        let request = request();
        assert!(!request.redacted_archive_url().contains("hunter2"));
        assert!(!request.redacted_checksum_url().contains("hunter2"));
        assert!(request.redacted_archive_url().contains(REDACTED_KEY));
    }

    #[test]
    fn display_uses_the_redacted_form() {
        let text = request().to_string();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("edition_id=GeoLite2-Country"));
    }

    #[test]
    fn archive_filename_joins_edition_and_suffix() {
        assert_eq!(request().archive_filename(), "GeoLite2-Country.tar.gz");
    }
}
