//! wav2mp3 - Batch WAV to MP3 conversion with tag transfer
//!
//! Walks a source tree, converts every WAV file into an MP3 at the same
//! relative path under a destination tree, and carries the WAV's metadata
//! across as an ID3v2 tag. Existing MP3s are never overwritten.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: WAV scanning and destination path resolution
//! - `audio`: symphonia decoding and LAME encoding
//! - `tags`: source tag reading, translation to ID3v2 frames, writing and preview
//! - `pipeline`: bounded worker pool, per-file worker and run orchestration
//! - `logging`: the per-run `conversion.log` sink
//!
//! # Example
//!
//! ```no_run
//! use wav2mp3::{config::Settings, pipeline};
//!
//! let settings = Settings::default();
//! let summary = pipeline::run(&settings).expect("Conversion failed");
//! println!("Converted {} files", summary.converted);
//! ```

pub mod audio;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod tags;
pub mod types;

// Re-export key types at crate root
pub use error::{ConvertError, Result};
pub use types::{Bitrate, ConversionOutcome, ConversionTask, RunSummary};
