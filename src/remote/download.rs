//! Downloader trait and HTTP implementation for the GeoIP endpoint.
//!
//! Provides a trait-based abstraction over the three remote operations the
//! pipeline needs: a metadata-only freshness probe (HTTP HEAD for
//! `Last-Modified`), the archive download, and the SHA-256 sidecar fetch.
//! The trait enables dependency injection so the pipeline can be tested
//! without network access.

use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use chrono::DateTime;
use log::trace;

use super::checksum::Sha256Digest;
use super::endpoint::DownloadRequest;

/// Network timeout for all endpoint requests.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors arising from remote download operations.
///
/// URL fields always carry the redacted form; the license key never
/// appears in an error message.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    HttpError {
        /// The redacted URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The endpoint returned 404 for the requested resource.
    #[error("resource not found: {url}")]
    NotFound {
        /// The redacted URL that returned 404.
        url: String,
    },

    /// The checksum sidecar body was not a well-formed digest.
    #[error("malformed checksum sidecar at {url}: {reason}")]
    MalformedChecksum {
        /// The redacted sidecar URL.
        url: String,
        /// Why the body could not be parsed.
        reason: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for the remote operations of a sync: freshness probe, archive
/// download, and checksum sidecar fetch.
#[cfg_attr(test, mockall::automock)]
pub trait GeoIpDownloader {
    /// Probe the remote archive's `Last-Modified` timestamp without
    /// downloading the body.
    ///
    /// Returns `None` when the endpoint does not report a timestamp or the
    /// header cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself fails.
    fn last_modified(&self, request: &DownloadRequest)
    -> Result<Option<SystemTime>, DownloadError>;

    /// Download the archive into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the download or the file write fails.
    fn download_archive(&self, request: &DownloadRequest, dest: &Path)
    -> Result<(), DownloadError>;

    /// Fetch the SHA-256 sidecar for the archive.
    ///
    /// Returns `None` when the endpoint publishes no sidecar (HTTP 404).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    fn download_checksum(
        &self,
        request: &DownloadRequest,
    ) -> Result<Option<Sha256Digest>, DownloadError>;
}

/// HTTP-based downloader using `ureq`.
pub struct HttpDownloader;

impl GeoIpDownloader for HttpDownloader {
    fn last_modified(
        &self,
        request: &DownloadRequest,
    ) -> Result<Option<SystemTime>, DownloadError> {
        let response = http_agent()
            .head(&request.archive_url())
            .call()
            .map_err(|e| map_ureq_error(&request.redacted_archive_url(), &e))?;
        Ok(parse_last_modified(
            response
                .headers()
                .get("last-modified")
                .and_then(|v| v.to_str().ok()),
        ))
    }

    fn download_archive(
        &self,
        request: &DownloadRequest,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let response = http_agent()
            .get(&request.archive_url())
            .call()
            .map_err(|e| map_ureq_error(&request.redacted_archive_url(), &e))?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(DownloadError::Io)?;
        Ok(())
    }

    fn download_checksum(
        &self,
        request: &DownloadRequest,
    ) -> Result<Option<Sha256Digest>, DownloadError> {
        let url = request.redacted_checksum_url();
        let response = match http_agent().get(&request.checksum_url()).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                trace!("no checksum sidecar at {url}");
                return Ok(None);
            }
            Err(e) => return Err(map_ureq_error(&url, &e)),
        };
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::HttpError {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        parse_checksum_body(&url, &body).map(Some)
    }
}

/// Parse an HTTP `Last-Modified` header value into a [`SystemTime`].
///
/// The header uses the RFC 7231 IMF-fixdate format, which the RFC 2822
/// parser accepts. Unparseable values degrade to `None` ("unknown"), never
/// to an error: a missing timestamp only disables the cache-hit shortcut.
fn parse_last_modified(header: Option<&str>) -> Option<SystemTime> {
    let value = header?;
    match DateTime::parse_from_rfc2822(value) {
        Ok(parsed) => Some(SystemTime::from(parsed)),
        Err(e) => {
            trace!("unparseable Last-Modified header {value:?}: {e}");
            None
        }
    }
}

/// Parse a checksum sidecar body of the form `{hex} {filename}`.
fn parse_checksum_body(url: &str, body: &str) -> Result<Sha256Digest, DownloadError> {
    let token = body
        .split_whitespace()
        .next()
        .ok_or_else(|| DownloadError::MalformedChecksum {
            url: url.to_owned(),
            reason: "empty body".to_owned(),
        })?;
    Sha256Digest::try_from(token).map_err(|e| DownloadError::MalformedChecksum {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`] carrying the redacted URL.
fn map_ureq_error(redacted_url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: redacted_url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: redacted_url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_imf_fixdate_last_modified() {
        let parsed = parse_last_modified(Some("Sun, 06 Nov 1994 08:49:37 GMT"))
            .expect("well-formed HTTP date");
        let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn missing_or_garbage_header_is_unknown() {
        assert!(parse_last_modified(None).is_none());
        assert!(parse_last_modified(Some("not a date")).is_none());
    }

    #[test]
    fn checksum_body_with_filename_column_parses() {
        let hex = "c".repeat(64);
        let body = format!("{hex}  GeoLite2-City.tar.gz\n");
        let digest = parse_checksum_body("https://example.test", &body).expect("parse");
        assert_eq!(digest.as_str(), hex);
    }

    #[test]
    fn empty_checksum_body_is_malformed() {
        let result = parse_checksum_body("https://example.test", "  \n");
        assert!(matches!(
            result,
            Err(DownloadError::MalformedChecksum { .. })
        ));
    }

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/archive", &err);
        assert!(matches!(mapped, DownloadError::NotFound { .. }));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(500);
        let mapped = map_ureq_error("https://example.test/archive", &err);
        assert!(matches!(mapped, DownloadError::HttpError { .. }));
    }
}
