//! File discovery and scanning

use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extension of the files we convert, matched case-insensitively
pub const SOURCE_EXTENSION: &str = "wav";

/// Recursively collect every WAV file under `root`, sorted by path
pub fn scan(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConvertError::SourceNotFound(root.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Cannot read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_source_file(path))
        .inspect(|path| debug!("Discovered: {}", path.display()))
        .collect();

    files.sort();

    info!("Discovered {} WAV files", files.len());

    Ok(files)
}

/// True for `*.wav` in any letter case
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
        .unwrap_or(false)
}
