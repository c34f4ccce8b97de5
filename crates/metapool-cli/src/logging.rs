use crate::cli::Cli;
use crate::error::{CliError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::{fmt, prelude::*};

/// Events from the library and the binary both live under this target prefix.
const METAPOOL_TARGET: &str = "metapool";

/// How much is logged and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub console: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            console: console_level(cli.verbose, cli.quiet),
            log_file: cli.log_file.clone(),
        }
    }

    /// The log file keeps at least DEBUG detail, whatever the console shows.
    fn file_level(&self) -> LevelFilter {
        self.console.max(LevelFilter::DEBUG)
    }
}

fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// metapool events pass at `level`; other crates never get past WARN.
fn target_filter(level: LevelFilter) -> Targets {
    Targets::new()
        .with_target(METAPOOL_TARGET, level)
        .with_default(level.min(LevelFilter::WARN))
}

/// Log files are appended to, so one file can collect a series of runs.
fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CliError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

pub fn setup_logging(settings: &LogSettings) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(target_filter(settings.console));

    let file_layer = settings
        .log_file
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(|file| {
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_filter(target_filter(settings.file_level()))
        });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
