//! Unified error types for wav2mp3
//!
//! Error strategy:
//! - Per-file errors (decode, encode, path, output): recoverable, the task fails and the batch continues
//! - Tag errors: recovered locally, the file converts with fewer (or no) tags
//! - Run errors (missing source root, bad configuration): fatal, abort before any task starts

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for wav2mp3 operations
#[derive(Debug, Error)]
pub enum ConvertError {
    // =========================================================================
    // Fatal errors - abort the whole run
    // =========================================================================
    #[error("Source directory does not exist: '{0}'\n  Tip: Check the path is correct and accessible")]
    SourceNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // Tag errors - recovered locally, never fail a conversion
    // =========================================================================
    #[error("Cannot read tags from '{path}': {reason}")]
    TagParse { path: PathBuf, reason: String },

    #[error("Cannot clone tag frame {frame}: {reason}")]
    TagClone { frame: String, reason: String },

    // =========================================================================
    // Per-file errors - task fails, siblings continue
    // =========================================================================
    #[error("Failed to decode '{path}': {reason}\n  Tip: If the file plays in other apps, it may use an unsupported WAV codec")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode '{path}': {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Cannot map '{path}' into the destination tree: {reason}")]
    Path { path: PathBuf, reason: String },

    #[error("Cannot write output to '{path}': {reason}")]
    Output { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for wav2mp3 operations
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Returns true if this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConvertError::SourceNotFound(_) | ConvertError::Config(_)
        )
    }

    /// Returns true if this error only affects a single file
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Returns true for failures raised by the decoder or the encoder
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            ConvertError::Decode { .. } | ConvertError::Encode { .. }
        )
    }

    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConvertError::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn encode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConvertError::Encode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an output error, spelling out the common causes
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            std::io::ErrorKind::AlreadyExists => {
                format!("File already exists: {}", path.display())
            }
            _ => err.to_string(),
        };
        ConvertError::Output { path, reason }
    }
}
