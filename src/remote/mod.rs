//! Remote endpoint access: URL construction, freshness probing, download.
//!
//! # Sub-modules
//!
//! - [`endpoint`] — Download URL construction with license-key redaction.
//! - [`download`] — Downloader trait and HTTP implementation.
//! - [`checksum`] — SHA-256 digest newtype and streaming file hashing.

pub mod checksum;
pub mod download;
pub mod endpoint;
