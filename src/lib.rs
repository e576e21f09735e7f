//! GeoLite2 cache synchronizer library.
//!
//! This crate keeps a local cache of MaxMind GeoLite2 `.mmdb` databases up
//! to date. It is used by the `geolite2-sync` CLI binary and can be
//! consumed programmatically, injecting custom downloader, extractor, or
//! validator implementations.
//!
//! # Modules
//!
//! - [`archive`] - tar.gz extraction with path traversal protection
//! - [`cache`] - Cache entry state and atomic promotion
//! - [`cli`] - Command-line argument definitions
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`edition`] - Typed allow-lists for editions and archive suffixes
//! - [`error`] - Semantic error types
//! - [`lock`] - Advisory locking for the cache directory
//! - [`publish`] - Copying a synchronized database into a destination
//! - [`remote`] - Endpoint URLs, freshness probing, downloads, checksums
//! - [`sync`] - The cache synchronization pipeline
//! - [`validate`] - Pluggable structural validity probe

pub mod archive;
pub mod cache;
pub mod cli;
pub mod dirs;
pub mod edition;
pub mod error;
pub mod lock;
pub mod publish;
pub mod remote;
pub mod sync;
pub mod validate;
