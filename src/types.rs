//! Core data types for wav2mp3
//!
//! These types represent the domain model and flow through the pipeline.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Bitrate
// =============================================================================

/// Constant bitrates (kbps) the MP3 encoder accepts
pub const SUPPORTED_BITRATES: [u32; 16] = [
    8, 16, 24, 32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// Target MP3 bitrate, written on the command line as `<integer>k`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bitrate {
    kbps: u32,
}

impl Bitrate {
    /// Kilobits per second
    pub fn kbps(self) -> u32 {
        self.kbps
    }
}

impl Default for Bitrate {
    fn default() -> Self {
        Self { kbps: 192 }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}k", self.kbps)
    }
}

impl FromStr for Bitrate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_suffix('k')
            .ok_or_else(|| format!("bitrate '{}' must look like 192k", s))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("bitrate '{}' must look like 192k", s));
        }

        let kbps: u32 = digits
            .parse()
            .map_err(|_| format!("bitrate '{}' is out of range", s))?;

        if !SUPPORTED_BITRATES.contains(&kbps) {
            let supported: Vec<String> = SUPPORTED_BITRATES.iter().map(|k| format!("{}k", k)).collect();
            return Err(format!(
                "unsupported bitrate '{}'. Supported: {}",
                s,
                supported.join(", ")
            ));
        }

        Ok(Self { kbps })
    }
}

// =============================================================================
// Tasks and outcomes
// =============================================================================

/// One WAV file to convert. Built by the orchestrator, consumed once by a worker.
#[derive(Debug, Clone)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bitrate: Bitrate,
    pub dry_run: bool,
}

/// Terminal state of a single conversion task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// MP3 written; `tags_copied` may be zero
    Converted { tags_copied: usize },
    /// Destination already existed, left untouched
    Skipped,
    /// Dry run: destination missing, would have been converted
    WouldConvert,
    /// Decode, encode or output failure
    Failed { error: String },
    /// Run was interrupted before this task could finish
    Cancelled,
}

impl ConversionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ConversionOutcome::Converted { .. } => "converted",
            ConversionOutcome::Skipped => "skipped",
            ConversionOutcome::WouldConvert => "would_convert",
            ConversionOutcome::Failed { .. } => "failed",
            ConversionOutcome::Cancelled => "cancelled",
        }
    }
}

/// A finished task paired with its outcome
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task: ConversionTask,
    pub outcome: ConversionOutcome,
}

// =============================================================================
// Run summary
// =============================================================================

/// Outcome counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_files: usize,
    pub converted: usize,
    pub skipped: usize,
    pub would_convert: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub dry_run: bool,
}

impl RunSummary {
    pub(crate) fn new(total_files: usize, dry_run: bool) -> Self {
        Self {
            total_files,
            dry_run,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { .. } => self.converted += 1,
            ConversionOutcome::Skipped => self.skipped += 1,
            ConversionOutcome::WouldConvert => self.would_convert += 1,
            ConversionOutcome::Failed { .. } => self.failed += 1,
            ConversionOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Number of outcomes recorded so far
    pub fn accounted(&self) -> usize {
        self.converted + self.skipped + self.would_convert + self.failed + self.cancelled
    }
}
