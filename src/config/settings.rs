//! Runtime configuration settings

use crate::types::Bitrate;
use std::path::PathBuf;

/// Upper bound on the default worker count
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Runtime settings for the conversion pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of the WAV tree
    pub source: PathBuf,
    /// Root of the MP3 tree
    pub destination: PathBuf,
    /// Target bitrate
    pub bitrate: Bitrate,
    /// Number of conversion worker threads
    pub workers: usize,
    /// Dry run mode - existence checks only
    pub dry_run: bool,
    /// Number of files whose tags are shown before converting
    pub preview: usize,
    /// Show progress bars
    pub show_progress: bool,
    /// Console log level; `None` keeps the console silent (the log file is always written)
    pub console_level: Option<tracing::Level>,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            source: cli.source.clone(),
            destination: cli.destination.clone(),
            bitrate: cli.bitrate,
            workers: cli.workers.unwrap_or_else(default_workers),
            dry_run: cli.dry_run,
            preview: cli.preview,
            show_progress: !cli.quiet,
            console_level: Some(cli.log_level()),
        }
    }
}

/// min(8, available hardware parallelism)
pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            destination: PathBuf::from("./mp3"),
            bitrate: Bitrate::default(),
            workers: default_workers(),
            dry_run: false,
            preview: 0,
            show_progress: true,
            console_level: Some(tracing::Level::WARN),
        }
    }
}
