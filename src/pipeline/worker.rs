//! Single-file conversion
//!
//! `Pending → Skipped | WouldConvert | Cancelled | Converting → Converted | Failed`
//!
//! The MP3 is encoded and tagged in a hidden staging file next to the
//! destination, then published with a no-clobber rename. The destination path
//! therefore never shows a half-written or untagged file, and an MP3 that
//! appears concurrently is never overwritten.

use super::cancel::CancelFlag;
use crate::audio::{self, Transcoded};
use crate::discovery::ensure_parent;
use crate::error::{ConvertError, Result};
use crate::tags;
use crate::types::{ConversionOutcome, ConversionTask};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Suffix of in-progress files; never matches the `.mp3` existence check
const STAGING_SUFFIX: &str = ".part";

/// Result of a conversion attempt that did not fail
enum Attempt {
    Converted { tags_copied: usize },
    AlreadyExists,
    Interrupted,
}

/// Run one task to its terminal outcome. Never panics on per-file errors.
pub fn convert(task: &ConversionTask, cancel: &CancelFlag) -> ConversionOutcome {
    if cancel.is_cancelled() {
        debug!("Not started (cancelled): {}", task.source.display());
        return ConversionOutcome::Cancelled;
    }

    if task.destination.exists() {
        info!("Skipped (already exists): {}", task.destination.display());
        return ConversionOutcome::Skipped;
    }

    if task.dry_run {
        debug!("Would convert: {}", task.source.display());
        return ConversionOutcome::WouldConvert;
    }

    match convert_file(task, cancel) {
        Ok(Attempt::Converted { tags_copied }) => {
            info!(
                "Converted: {} -> {} (tags copied: {})",
                task.source.display(),
                task.destination.display(),
                tags_copied
            );
            ConversionOutcome::Converted { tags_copied }
        }
        Ok(Attempt::AlreadyExists) => {
            info!(
                "Skipped (appeared during conversion): {}",
                task.destination.display()
            );
            ConversionOutcome::Skipped
        }
        Ok(Attempt::Interrupted) => {
            warn!("Cancelled mid-conversion: {}", task.source.display());
            ConversionOutcome::Cancelled
        }
        Err(e) => {
            error!("Failed {}: {}", task.source.display(), e);
            ConversionOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

fn convert_file(task: &ConversionTask, cancel: &CancelFlag) -> Result<Attempt> {
    ensure_parent(&task.destination)?;
    let dir = task.destination.parent().unwrap_or_else(|| Path::new("."));

    // Built from scratch for every file
    let tags = tags::target_tags_for(&task.source);

    let file_name = task
        .destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(STAGING_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| ConvertError::output_error(dir, e))?;

    // The encoder borrows the staging file only inside this block
    let interrupted = {
        let transcoded = audio::transcode(
            &task.source,
            BufWriter::new(staging.as_file()),
            &task.destination,
            task.bitrate,
            || cancel.is_cancelled(),
        )?;
        matches!(transcoded, Transcoded::Interrupted)
    };
    if interrupted {
        // Dropping the staging file deletes it
        return Ok(Attempt::Interrupted);
    }

    let tags_copied = match tags::write_tags(staging.path(), &tags) {
        Ok(written) => written,
        Err(e) => {
            warn!(
                "Tags could not be written for {}: {}",
                task.source.display(),
                e
            );
            0
        }
    };

    staging
        .as_file()
        .sync_all()
        .map_err(|e| ConvertError::output_error(staging.path(), e))?;

    match staging.persist_noclobber(&task.destination) {
        Ok(_) => Ok(Attempt::Converted { tags_copied }),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(Attempt::AlreadyExists),
        Err(e) => Err(ConvertError::output_error(&task.destination, e.error)),
    }
}
