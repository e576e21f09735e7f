//! GeoLite2 synchronizer CLI entrypoint.
//!
//! Parses arguments, resolves the cache directory, takes the cache lock,
//! runs the sync pipeline, and optionally publishes the resulting database
//! into a destination directory. Progress goes to stderr; the resolved
//! cache path is printed to stdout for scripting.

use camino::Utf8PathBuf;
use clap::Parser;
use geolite2_sync::cli::Cli;
use geolite2_sync::dirs::{BaseDirs, SystemBaseDirs};
use geolite2_sync::error::{Result, SyncError};
use geolite2_sync::lock::CacheLock;
use geolite2_sync::publish::publish;
use geolite2_sync::remote::endpoint::DownloadRequest;
use geolite2_sync::sync::{SyncAction, SyncOutcome, sync_with_defaults};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let cache_dir = resolve_cache_dir(cli.cache_dir.clone(), &SystemBaseDirs)?;
    let request = DownloadRequest::new(cli.edition, cli.suffix, cli.license_key.clone());

    if cli.dry_run {
        print_dry_run_info(cli, &cache_dir, &request, stderr);
        return Ok(());
    }

    // The lock also creates the cache directory.
    let _lock = CacheLock::acquire(&cache_dir)?;

    if !cli.quiet {
        write_stderr_line(
            stderr,
            format!("Synchronizing {} into {cache_dir}...", cli.edition),
        );
    }

    let outcome = sync_with_defaults(&request, &cache_dir, &cli.sync_options())?;
    if !cli.quiet {
        report_outcome(&outcome, stderr);
    }

    if let Some(dest_dir) = &cli.dest_dir {
        let published = publish(&outcome.path, dest_dir)?;
        if !cli.quiet {
            write_stderr_line(stderr, format!("Published to {published}"));
        }
    }

    println!("{}", outcome.path);
    Ok(())
}

/// Use the caller's cache directory or fall back to the platform default.
fn resolve_cache_dir(cli_cache_dir: Option<Utf8PathBuf>, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    cli_cache_dir
        .or_else(|| dirs.cache_dir())
        .ok_or(SyncError::CacheDirUnavailable)
}

/// Describe what the sync did, mirroring its log warnings on stderr.
fn report_outcome(outcome: &SyncOutcome, stderr: &mut dyn Write) {
    let message = match outcome.action {
        SyncAction::Downloaded => format!("Downloaded {}", outcome.path),
        SyncAction::UpToDate => format!("{} is up-to-date", outcome.path),
        SyncAction::OfflineUnverified => {
            format!("Offline mode: using {} without a freshness check", outcome.path)
        }
        SyncAction::StaleFallback => {
            format!("Update failed: keeping previously cached {}", outcome.path)
        }
    };
    write_stderr_line(stderr, message);
}

/// Print the configuration a real run would use.
fn print_dry_run_info(
    cli: &Cli,
    cache_dir: &Utf8PathBuf,
    request: &DownloadRequest,
    stderr: &mut dyn Write,
) {
    write_stderr_line(stderr, "Dry run - no files will be modified");
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, format!("Edition: {}", cli.edition));
    write_stderr_line(stderr, format!("Endpoint: {request}"));
    write_stderr_line(stderr, format!("Cache directory: {cache_dir}"));
    match &cli.dest_dir {
        Some(dest) => write_stderr_line(stderr, format!("Destination directory: {dest}")),
        None => write_stderr_line(stderr, "Destination directory: (none)"),
    }
    write_stderr_line(stderr, format!("Force: {}", cli.force));
    write_stderr_line(stderr, format!("Offline: {}", cli.offline));
    write_stderr_line(stderr, format!("Fail on no-op: {}", cli.fail_on_no_op));
    write_stderr_line(
        stderr,
        format!("Verify checksum: {}", !cli.is_no_verify),
    );
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDirs(Option<Utf8PathBuf>);

    impl BaseDirs for FixedDirs {
        fn cache_dir(&self) -> Option<Utf8PathBuf> {
            self.0.clone()
        }
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = SyncError::NoOpNotAllowed;

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("fail-on-no-op"));
    }

    #[test]
    fn resolve_cache_dir_prefers_the_cli_argument() {
        let dirs = FixedDirs(Some(Utf8PathBuf::from("/platform/cache")));
        let resolved = resolve_cache_dir(Some(Utf8PathBuf::from("/custom")), &dirs)
            .expect("cache dir");
        assert_eq!(resolved, Utf8PathBuf::from("/custom"));
    }

    #[test]
    fn resolve_cache_dir_falls_back_to_the_platform_default() {
        let dirs = FixedDirs(Some(Utf8PathBuf::from("/platform/cache")));
        let resolved = resolve_cache_dir(None, &dirs).expect("cache dir");
        assert_eq!(resolved, Utf8PathBuf::from("/platform/cache"));
    }

    #[test]
    fn resolve_cache_dir_fails_without_any_candidate() {
        let err = resolve_cache_dir(None, &FixedDirs(None)).expect_err("no cache dir");
        assert!(matches!(err, SyncError::CacheDirUnavailable));
    }

    #[test]
    fn report_outcome_mentions_the_path() {
        let outcome = SyncOutcome {
            path: Utf8PathBuf::from("/cache/GeoLite2-City.mmdb"),
            action: SyncAction::StaleFallback,
        };
        let mut stderr = Vec::new();
        report_outcome(&outcome, &mut stderr);
        let text = String::from_utf8(stderr).expect("UTF-8");
        assert!(text.contains("GeoLite2-City.mmdb"));
        assert!(text.contains("previously cached"));
    }
}
