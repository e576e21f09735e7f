//! Typed allow-lists for GeoLite2 edition names and archive suffixes.
//!
//! The download endpoint only serves a fixed set of free editions and a
//! single archive format. Parsing these into enums up front means the rest
//! of the pipeline cannot be handed an unsupported artifact: a descriptor
//! is valid by construction.

use crate::error::SyncError;
use std::fmt;
use std::str::FromStr;

/// A supported GeoLite2 database edition.
///
/// # Examples
///
/// ```
/// use geolite2_sync::edition::Edition;
///
/// let edition: Edition = "GeoLite2-City".parse().unwrap();
/// assert_eq!(edition.database_filename(), "GeoLite2-City.mmdb");
/// assert!("GeoLite2-Planet".parse::<Edition>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edition {
    /// The autonomous system number database.
    Asn,
    /// The city-level geolocation database.
    City,
    /// The country-level geolocation database.
    Country,
}

impl Edition {
    /// All supported editions, in the order they are documented.
    pub const ALL: [Edition; 3] = [Edition::Asn, Edition::City, Edition::Country];

    /// Return the edition identifier as used by the download endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Edition::Asn => "GeoLite2-ASN",
            Edition::City => "GeoLite2-City",
            Edition::Country => "GeoLite2-Country",
        }
    }

    /// Return the canonical database filename, `{edition}.mmdb`.
    #[must_use]
    pub fn database_filename(self) -> String {
        format!("{}.mmdb", self.as_str())
    }

    /// Comma-separated list of supported edition names, for error messages.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Edition {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| SyncError::UnsupportedEdition {
                name: s.to_owned(),
                supported: Self::supported_list(),
            })
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported archive suffix for the download endpoint.
///
/// Only gzip-compressed tar archives are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveSuffix {
    /// A gzip-compressed tar archive (`tar.gz`).
    #[default]
    TarGz,
}

impl ArchiveSuffix {
    /// All supported suffixes.
    pub const ALL: [ArchiveSuffix; 1] = [ArchiveSuffix::TarGz];

    /// Return the suffix string as used in the download URL.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveSuffix::TarGz => "tar.gz",
        }
    }

    /// Return the suffix of the SHA-256 sidecar for this archive format.
    #[must_use]
    pub fn checksum_suffix(self) -> String {
        format!("{}.sha256", self.as_str())
    }

    /// Comma-separated list of supported suffixes, for error messages.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ArchiveSuffix {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suffix| suffix.as_str() == s)
            .ok_or_else(|| SyncError::UnsupportedSuffix {
                suffix: s.to_owned(),
                supported: Self::supported_list(),
            })
    }
}

impl fmt::Display for ArchiveSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::asn("GeoLite2-ASN", Edition::Asn)]
    #[case::city("GeoLite2-City", Edition::City)]
    #[case::country("GeoLite2-Country", Edition::Country)]
    fn parses_supported_editions(#[case] input: &str, #[case] expected: Edition) {
        let edition: Edition = input.parse().expect("supported edition");
        assert_eq!(edition, expected);
        assert_eq!(edition.as_str(), input);
    }

    #[rstest]
    #[case::unknown("GeoLite2-Planet")]
    #[case::lowercase("geolite2-city")]
    #[case::empty("")]
    fn rejects_unsupported_editions(#[case] input: &str) {
        let err = input.parse::<Edition>().expect_err("unsupported edition");
        assert!(matches!(err, SyncError::UnsupportedEdition { .. }));
    }

    #[test]
    fn database_filename_appends_mmdb() {
        assert_eq!(Edition::Asn.database_filename(), "GeoLite2-ASN.mmdb");
    }

    #[test]
    fn parses_tar_gz_suffix() {
        let suffix: ArchiveSuffix = "tar.gz".parse().expect("supported suffix");
        assert_eq!(suffix, ArchiveSuffix::TarGz);
    }

    #[rstest]
    #[case::zip("zip")]
    #[case::tar_zst("tar.zst")]
    #[case::empty("")]
    fn rejects_unsupported_suffixes(#[case] input: &str) {
        let err = input
            .parse::<ArchiveSuffix>()
            .expect_err("unsupported suffix");
        assert!(matches!(err, SyncError::UnsupportedSuffix { .. }));
    }

    #[test]
    fn checksum_suffix_appends_sha256() {
        assert_eq!(ArchiveSuffix::TarGz.checksum_suffix(), "tar.gz.sha256");
    }
}
