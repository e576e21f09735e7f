//! SHA-256 digest newtype and streaming file hashing.
//!
//! The download endpoint publishes a `{suffix}.sha256` sidecar next to each
//! archive. Digests are validated as 64-character lowercase hexadecimal on
//! construction, so comparisons elsewhere can stay plain equality.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Error produced when a digest string is malformed.
#[derive(Debug, thiserror::Error)]
#[error("invalid SHA-256 digest: {reason}")]
pub struct InvalidDigest {
    /// What was wrong with the digest string.
    pub reason: String,
}

/// A validated hex-encoded SHA-256 digest.
///
/// # Examples
///
/// ```
/// use geolite2_sync::remote::checksum::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest = Sha256Digest::try_from(hex.as_str()).unwrap();
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = InvalidDigest;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_digest(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = InvalidDigest;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_digest(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate that `value` is a well-formed lowercase hex SHA-256 digest.
fn validate_digest(value: &str) -> Result<(), InvalidDigest> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(InvalidDigest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
    {
        return Err(InvalidDigest {
            reason: format!("unexpected character {bad:?}"),
        });
    }
    Ok(())
}

/// Compute the SHA-256 digest of the file at `path` by streaming.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn compute_sha256(path: &Path) -> std::io::Result<Sha256Digest> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    let hex = format!("{:x}", hasher.finalize());
    // sha2 always produces valid 64-char lowercase hex.
    Ok(Sha256Digest(hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_lowercase_hex() {
        let digest = Sha256Digest::try_from("a".repeat(64));
        assert!(digest.is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Sha256Digest::try_from("abcdef").is_err());
        assert!(Sha256Digest::try_from("a".repeat(65).as_str()).is_err());
    }

    #[test]
    fn rejects_uppercase_and_non_hex() {
        assert!(Sha256Digest::try_from("A".repeat(64).as_str()).is_err());
        let mut bad = "a".repeat(63);
        bad.push('g');
        assert!(Sha256Digest::try_from(bad).is_err());
    }

    #[test]
    fn compute_sha256_matches_known_vector() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data");
        std::fs::write(&path, b"abc").expect("write");

        let digest = compute_sha256(&path).expect("hash");
        assert_eq!(
            digest.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn display_shows_the_hex() {
        let hex = "b".repeat(64);
        let digest = Sha256Digest::try_from(hex.as_str()).expect("known good");
        assert_eq!(digest.to_string(), hex);
    }
}
