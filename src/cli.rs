//! CLI argument definitions for the GeoLite2 synchronizer.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use crate::edition::{ArchiveSuffix, Edition};
use crate::sync::SyncOptions;
use camino::Utf8PathBuf;
use clap::Parser;

/// Synchronize a MaxMind GeoLite2 database into a local cache.
#[derive(Parser, Debug)]
#[command(name = "geolite2-sync")]
#[command(version, about)]
#[command(long_about = concat!(
    "Synchronize a MaxMind GeoLite2 database into a local cache.\n\n",
    "The tool keeps one canonical .mmdb file per edition in the cache ",
    "directory. On each run it probes the download endpoint's Last-Modified ",
    "timestamp and only downloads when the remote copy is newer than the ",
    "cached one; the archive is verified, extracted, and promoted into the ",
    "cache with an atomic rename. A cache file that fails the structural ",
    "validity probe is replaced automatically.\n\n",
    "A MaxMind license key is required; pass --license-key or set ",
    "MAXMIND_LICENSE_KEY.",
))]
#[command(after_help = concat!(
    "EDITIONS:\n",
    "  GeoLite2-ASN       Autonomous system numbers\n",
    "  GeoLite2-City      City-level geolocation\n",
    "  GeoLite2-Country   Country-level geolocation\n\n",
    "EXAMPLES:\n",
    "  Keep the city database fresh in the default cache:\n",
    "    $ geolite2-sync -e GeoLite2-City\n\n",
    "  Publish into a project resource directory:\n",
    "    $ geolite2-sync -e GeoLite2-Country -d src/main/resources/geoip\n\n",
    "  Use the cache without touching the network:\n",
    "    $ geolite2-sync -e GeoLite2-City --offline\n\n",
    "  Discard the cache and fetch unconditionally:\n",
    "    $ geolite2-sync -e GeoLite2-City --force\n",
))]
pub struct Cli {
    /// GeoLite2 edition to synchronize.
    #[arg(short, long, value_name = "EDITION")]
    pub edition: Edition,

    /// Archive suffix requested from the download endpoint.
    #[arg(long, value_name = "SUFFIX", default_value = "tar.gz")]
    pub suffix: ArchiveSuffix,

    /// MaxMind license key authorizing the download.
    #[arg(
        short = 'k',
        long,
        env = "MAXMIND_LICENSE_KEY",
        value_name = "KEY",
        hide_env_values = true
    )]
    pub license_key: String,

    /// Cache directory [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Also copy the synchronized database into this directory.
    #[arg(short, long, value_name = "DIR")]
    pub dest_dir: Option<Utf8PathBuf>,

    /// Discard any cached copy and fetch unconditionally.
    #[arg(short, long)]
    pub force: bool,

    /// Permit no network access; use the cache as-is or fail.
    #[arg(long)]
    pub offline: bool,

    /// Fail when the run would complete without performing an update.
    #[arg(long = "fail-on-no-op")]
    pub fail_on_no_op: bool,

    /// Skip SHA-256 sidecar verification of the downloaded archive.
    #[arg(long = "no-verify")]
    pub is_no_verify: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,

    /// Show configuration and exit without network or filesystem changes.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Translate the parsed flags into the pipeline's sync options.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            force: self.force,
            offline: self.offline,
            fail_on_no_op: self.fail_on_no_op,
            verify_checksum: !self.is_no_verify,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
