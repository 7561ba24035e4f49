//! Tracing subscriber setup.
//!
//! The terminal UI owns stdout, so interactive sessions log to a file in the
//! data directory. Command line subcommands log to stderr.

use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "quote-wizard.log";

/// `RUST_LOG` wins; otherwise `debug` when verbose, `info` when not.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

/// Routes log output to `dir/quote-wizard.log`.
///
/// Keep the returned guard alive for the whole session; dropping it flushes
/// and stops the background writer.
pub fn init_file_logging(dir: &Path, verbose: bool) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

pub fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(io::stderr)
        .init();
}
