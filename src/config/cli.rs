//! CLI argument parsing and configuration

use crate::types::Bitrate;
use clap::Parser;
use std::path::PathBuf;

/// wav2mp3 - Batch WAV to MP3 conversion with tag transfer
///
/// Recursively converts every WAV file under SOURCE into an MP3 under DEST,
/// mirroring the directory structure. Title, artist, album, year, genre, track,
/// comments and cover art are copied from the WAV's ID3 or RIFF INFO tags.
/// Existing MP3s are never overwritten.
///
/// Exit status is 0 whenever the run completes, even if individual files failed;
/// failures are reported in the summary and in DEST/conversion.log.
#[derive(Parser, Debug)]
#[command(name = "wav2mp3")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Source directory containing WAV files
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination directory for MP3 files (created if missing)
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Target bitrate, e.g. 128k, 192k, 320k
    #[arg(value_name = "BITRATE", value_parser = parse_bitrate)]
    pub bitrate: Bitrate,

    /// Number of parallel workers (defaults to min(8, CPU count))
    #[arg(short = 'j', long, value_name = "N", value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Dry run - report what would be converted without writing any MP3
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Show the tags of the first N WAV files before converting
    #[arg(long, value_name = "N", default_value = "0")]
    pub preview: usize,

    /// Print the summary as JSON instead of a table
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no progress bar, errors only)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the console log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn parse_bitrate(value: &str) -> Result<Bitrate, String> {
    value.parse()
}

fn parse_workers(value: &str) -> Result<usize, String> {
    let workers: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", value))?;
    if workers == 0 {
        return Err("worker count must be at least 1".to_string());
    }
    Ok(workers)
}
